//! Property tests for the reference codec and layout invariants.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{plan, text_draws, text_draws_in, EPSILON};
use proptest::prelude::*;
use xlplan::cell_ref::{decode, encode};
use xlplan::cell_text::DisplayGrid;
use xlplan::layout::{solve_column_widths, MergeMap};
use xlplan::{Cell, Grid, LayoutConfig, MergeRegion, RenderContext, SheetData};

fn sheet_from(texts: Vec<Vec<String>>) -> SheetData {
    SheetData::new(Grid::new(
        texts
            .into_iter()
            .map(|row| row.into_iter().map(Cell::text).collect())
            .collect(),
    ))
}

fn text_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[ -~]{0,12}", 1..5), 1..8)
}

proptest! {
    #[test]
    fn reference_roundtrip(row in 1u32..=1_048_576, col in 1u32..=16_384) {
        let encoded = encode(row, col);
        let decoded = decode(&encoded).unwrap();
        prop_assert_eq!((decoded.row, decoded.col), (row, col));
    }

    #[test]
    fn canonical_reference_roundtrip(letters in "[A-Z]{1,3}", row in 1u32..100_000) {
        let reference = format!("{letters}{row}");
        let decoded = decode(&reference).unwrap();
        prop_assert_eq!(encode(decoded.row, decoded.col), reference);
    }

    #[test]
    fn malformed_references_are_rejected(s in "[a-z$ ]{1,3}[0-9]{0,3}") {
        prop_assert!(decode(&s).is_err());
    }

    #[test]
    fn widths_cover_requirements(rows in text_rows()) {
        let sheet = sheet_from(rows);
        let config = LayoutConfig::default();
        let texts = DisplayGrid::resolve(&sheet.grid, 2);
        let mut ctx = RenderContext::new();
        let widths = solve_column_widths(
            &sheet.grid, &texts, &MergeMap::default(), &mut ctx, &config,
        );

        prop_assert_eq!(widths.len(), sheet.grid.total_cols());
        for (row, col, cell) in sheet.grid.iter_cells() {
            let required = ctx.measure_text(
                texts.text(row, col),
                cell.style.font_variant(),
                config.default_font_size,
            ) + config.padding + config.extra_space;
            prop_assert!(widths.width(col) + EPSILON >= required);
            prop_assert!(widths.width(col) >= config.padding);
        }
    }

    #[test]
    fn merged_span_covers_anchor(
        rows in text_rows(),
        title in "[A-Za-z ]{10,60}",
    ) {
        let mut sheet = sheet_from(rows);
        let cols = u32::try_from(sheet.grid.total_cols()).unwrap();
        let mut grid_rows = sheet.grid.rows().to_vec();
        grid_rows[0][0] = Cell::text(title.clone());
        sheet.grid = Grid::new(grid_rows);
        let region = MergeRegion::new(1, 1, 1, cols);

        let config = LayoutConfig::default();
        let texts = DisplayGrid::resolve(&sheet.grid, 2);
        let mut ctx = RenderContext::new();
        let widths = solve_column_widths(
            &sheet.grid, &texts, &MergeMap::build(&[region], &sheet.grid), &mut ctx, &config,
        );
        let required = ctx.measure_text(&title, xlplan::FontVariant::Regular, 11.0) + 20.0;
        prop_assert!(widths.span_width(1, cols) + EPSILON >= required);
    }

    #[test]
    fn text_on_a_line_never_overlaps(rows in text_rows()) {
        let plan = plan(&sheet_from(rows), &LayoutConfig::default());
        common::assert_no_horizontal_overlap(&text_draws(&plan));
    }

    #[test]
    fn paginated_rows_fit_their_page(rows in 1usize..60, height in 80.0f64..400.0) {
        let config = LayoutConfig {
            max_page_height: height,
            margin: 10.0,
            ..LayoutConfig::default()
        }
        .paginated();
        let plan = plan(&fixtures::text_grid(rows, 1), &config);

        let mut drawn = 0;
        for page in plan.pages() {
            let draws = text_draws_in(page);
            prop_assert!(!draws.is_empty());
            for d in &draws {
                let row_top = d.y - (config.row_height - d.font_size) / 2.0;
                prop_assert!(row_top + config.row_height <= height - config.margin + EPSILON);
            }
            drawn += draws.len();
        }
        prop_assert_eq!(drawn, rows);
    }
}
