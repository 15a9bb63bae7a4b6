//! Test fixtures for building decoded sheets in memory.
//!
//! Sheets are described with A1-style references, the way a reader would see
//! them in a workbook.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{SheetBuilder, StyleBuilder};
//!
//! let sheet = SheetBuilder::new()
//!     .cell("A1", "Name", Some(StyleBuilder::new().bold().build()))
//!     .number("B2", 42.0, "0.00", None)
//!     .merge("A1:B1")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use xlplan::cell_ref::{decode, parse_range};
use xlplan::{
    BorderSide, BorderStyle, Borders, Cell, CellStyle, CellValue, EmbeddedImage, FormulaCell,
    FormulaValue, Grid, HAlign, ImageAnchor, SheetData,
};

/// Minimal valid PNG signature; enough for format sniffing.
pub const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

// ============================================================================
// Style Builder
// ============================================================================

/// Builder for creating cell styles.
#[derive(Debug, Clone, Default)]
pub struct StyleBuilder {
    style: CellStyle,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.style.font.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.font.italic = true;
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.style.font.size = Some(size);
        self
    }

    pub fn font_color(mut self, color: &str) -> Self {
        self.style.font.color = Some(color.to_string());
        self
    }

    pub fn fill(mut self, color: &str) -> Self {
        self.style.fill = Some(color.to_string());
        self
    }

    pub fn border_all(mut self, style: BorderStyle, color: Option<&str>) -> Self {
        self.style.border = Borders::all(BorderSide {
            style,
            color: color.map(str::to_string),
        });
        self
    }

    pub fn border_bottom(mut self, style: BorderStyle) -> Self {
        self.style.border.bottom = Some(BorderSide::new(style));
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.style.align_h = align;
        self
    }

    pub fn build(self) -> CellStyle {
        self.style
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// Builder for a decoded sheet. Cells may be set in any order; the grid grows
/// to the furthest referenced cell.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    rows: Vec<Vec<Cell>>,
    sheet: SheetData,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell's raw value at an A1-style reference.
    pub fn value(mut self, reference: &str, value: CellValue, style: Option<CellStyle>) -> Self {
        let pos = decode(reference).expect("valid cell reference");
        let (r, c) = ((pos.row - 1) as usize, (pos.col - 1) as usize);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.rows[r];
        if row.len() <= c {
            row.resize_with(c + 1, Cell::default);
        }
        row[c] = Cell {
            value,
            style: style.unwrap_or_default(),
            rendered: None,
        };
        self
    }

    pub fn cell(self, reference: &str, text: &str, style: Option<CellStyle>) -> Self {
        self.value(reference, CellValue::Text(text.to_string()), style)
    }

    pub fn number(self, reference: &str, value: f64, format: &str, style: Option<CellStyle>) -> Self {
        self.value(
            reference,
            CellValue::Number {
                value,
                format: format.to_string(),
            },
            style,
        )
    }

    pub fn formula(self, reference: &str, formula: &str, result: Option<FormulaValue>) -> Self {
        self.value(
            reference,
            CellValue::Formula(FormulaCell {
                formula: formula.to_string(),
                result,
                ..FormulaCell::default()
            }),
            None,
        )
    }

    /// Add a merged range such as `"A1:B2"`.
    pub fn merge(mut self, range: &str) -> Self {
        self.sheet
            .merges
            .push(parse_range(range).expect("valid merge range"));
        self
    }

    /// Anchor a PNG of the given pixel size at an A1-style reference.
    pub fn png(mut self, id: &str, reference: &str, width_px: u32, height_px: u32) -> Self {
        let pos = decode(reference).expect("valid cell reference");
        let anchor = ImageAnchor {
            row: pos.row - 1,
            col: pos.col - 1,
        };
        self.sheet
            .images
            .push(EmbeddedImage::from_bytes(id, &PNG_HEADER, anchor).with_size(width_px, height_px));
        self
    }

    pub fn image(mut self, image: EmbeddedImage) -> Self {
        self.sheet.images.push(image);
        self
    }

    /// Pad the grid to at least `rows x cols` empty cells.
    pub fn size(mut self, rows: usize, cols: usize) -> Self {
        if self.rows.len() < rows {
            self.rows.resize_with(rows, Vec::new);
        }
        if let Some(first) = self.rows.first_mut() {
            if first.len() < cols {
                first.resize_with(cols, Cell::default);
            }
        }
        self
    }

    pub fn build(self) -> SheetData {
        SheetData {
            grid: Grid::new(self.rows),
            ..self.sheet
        }
    }
}

/// `rows x cols` grid of distinct text cells (`"r{row}c{col}"`, 1-based).
pub fn text_grid(rows: usize, cols: usize) -> SheetData {
    let rows = (1..=rows)
        .map(|r| (1..=cols).map(|c| Cell::text(format!("r{r}c{c}"))).collect())
        .collect();
    SheetData::new(Grid::new(rows))
}
