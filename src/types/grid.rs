use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Cell, EmbeddedImage};

/// Rectangular grid of cells, fixed at construction.
///
/// Rows shorter than the widest row are padded with empty cells so every row
/// holds exactly `total_cols` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    total_cols: usize,
}

impl Grid {
    pub fn new(mut rows: Vec<Vec<Cell>>) -> Self {
        let total_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize_with(total_cols, Cell::default);
        }
        Self { rows, total_cols }
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn total_cols(&self) -> usize {
        self.total_cols
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Look up a cell by 1-based position.
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        let r = usize::try_from(row).ok()?.checked_sub(1)?;
        let c = usize::try_from(col).ok()?.checked_sub(1)?;
        self.rows.get(r)?.get(c)
    }

    /// Iterate cells in row-major order with their 1-based (row, col).
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        self.rows.iter().zip(1u32..).flat_map(|(row, r)| {
            row.iter().zip(1u32..).map(move |(cell, c)| (r, c, cell))
        })
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        Ok(Self::new(rows))
    }
}

/// Inclusive, 1-based merged region. The anchor is `(top_row, left_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRegion {
    pub top_row: u32,
    pub left_col: u32,
    pub bottom_row: u32,
    pub right_col: u32,
}

impl MergeRegion {
    /// Build a region from two corners, normalizing reversed coordinates.
    pub fn new(top_row: u32, left_col: u32, bottom_row: u32, right_col: u32) -> Self {
        Self {
            top_row: top_row.min(bottom_row),
            left_col: left_col.min(right_col),
            bottom_row: top_row.max(bottom_row),
            right_col: left_col.max(right_col),
        }
    }

    /// Same region with corners in order.
    pub fn normalized(self) -> Self {
        Self::new(self.top_row, self.left_col, self.bottom_row, self.right_col)
    }

    pub fn row_span(&self) -> u32 {
        self.bottom_row.saturating_sub(self.top_row) + 1
    }

    pub fn col_span(&self) -> u32 {
        self.right_col.saturating_sub(self.left_col) + 1
    }

    pub fn is_anchor(&self, row: u32, col: u32) -> bool {
        row == self.top_row && col == self.left_col
    }
}

/// Everything the reading collaborator hands over for one sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub grid: Grid,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<MergeRegion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<EmbeddedImage>,
}

impl SheetData {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            merges: Vec::new(),
            images: Vec::new(),
        }
    }
}
