//! Column widths and page geometry, driven stage by stage.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_close, plan};
use fixtures::{text_grid, SheetBuilder, StyleBuilder};
use test_case::test_case;
use xlplan::cell_text::DisplayGrid;
use xlplan::config::{A4_HEIGHT, A4_WIDTH};
use xlplan::layout::{plan_layout, solve_column_widths, ColumnWidths, MergeMap, PageGeometry};
use xlplan::{FontVariant, LayoutConfig, RenderContext, SheetData};

fn widths_for(sheet: &SheetData, config: &LayoutConfig) -> ColumnWidths {
    let texts = DisplayGrid::resolve(&sheet.grid, config.fixed_decimal_places);
    let merges = MergeMap::build(&sheet.merges, &sheet.grid);
    solve_column_widths(&sheet.grid, &texts, &merges, &mut RenderContext::new(), config)
}

// ============================================================================
// COLUMN WIDTHS
// ============================================================================

#[test]
fn test_empty_cells_still_get_padding_and_slack() {
    let sheet = SheetBuilder::new().size(2, 3).build();
    let widths = widths_for(&sheet, &LayoutConfig::default());
    assert_eq!(widths.as_slice(), &[20.0, 20.0, 20.0]);
}

#[test]
fn test_widest_cell_wins() {
    let sheet = SheetBuilder::new()
        .cell("A1", "i", None)
        .cell("A2", "WWWW", None)
        .cell("A3", "mm", None)
        .build();
    let widths = widths_for(&sheet, &LayoutConfig::default());
    assert_close(widths.width(1), 4.0 * 944.0 * 11.0 / 1000.0 + 20.0);
}

#[test]
fn test_bold_and_size_widen_columns() {
    let plain = SheetBuilder::new().cell("A1", "Total", None).build();
    let bold = SheetBuilder::new()
        .cell("A1", "Total", Some(StyleBuilder::new().bold().build()))
        .build();
    let large = SheetBuilder::new()
        .cell("A1", "Total", Some(StyleBuilder::new().font_size(22.0).build()))
        .build();
    let config = LayoutConfig::default();

    let w_plain = widths_for(&plain, &config).total();
    let w_bold = widths_for(&bold, &config).total();
    let w_large = widths_for(&large, &config).total();
    assert!(w_bold > w_plain);
    assert_close(w_large - 20.0, 2.0 * (w_plain - 20.0));
}

#[test_case(0.0, 0.0 ; "no padding")]
#[test_case(4.0, 0.0 ; "padding only")]
#[test_case(4.0, 12.0 ; "padding and slack")]
fn test_padding_and_extra_space(padding: f64, extra_space: f64) {
    let config = LayoutConfig {
        padding,
        extra_space,
        ..LayoutConfig::default()
    };
    let sheet = SheetBuilder::new().cell("A1", "Age", None).build();
    let measured = RenderContext::new().measure_text("Age", FontVariant::Regular, 11.0);
    assert_close(
        widths_for(&sheet, &config).total(),
        measured + padding + extra_space,
    );
}

#[test]
fn test_number_formats_affect_width() {
    let short = SheetBuilder::new().number("A1", 5.0, "", None).build();
    let fixed = SheetBuilder::new().number("A1", 5.0, "0.000", None).build();
    let config = LayoutConfig::default();
    // "5" vs "5.000": three zeros and a period
    let extra = (3.0 * 556.0 + 278.0) * 11.0 / 1000.0;
    assert_close(
        widths_for(&fixed, &config).total() - widths_for(&short, &config).total(),
        extra,
    );
}

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

#[test]
fn test_page_fits_table_plus_margins() {
    let sheet = text_grid(3, 2);
    let config = LayoutConfig::default();
    let widths = widths_for(&sheet, &config);
    let layout = plan_layout(&sheet, &MergeMap::default(), &widths, &config);

    assert_close(layout.geometry.width, widths.total() + 60.0);
    assert_close(layout.geometry.height, 3.0 * 20.0 + 60.0);
    assert!(!layout.geometry.paginate);
}

#[test]
fn test_page_width_is_capped() {
    let config = LayoutConfig {
        max_page_width: 200.0,
        ..LayoutConfig::default()
    };
    let plan = plan(&text_grid(1, 20), &config);
    assert_close(plan.page_width, 200.0);
}

#[test]
fn test_minimum_size_raises_small_pages() {
    let config = LayoutConfig {
        enforce_minimum_size: true,
        ..LayoutConfig::default()
    };
    let plan = plan(&text_grid(1, 1), &config);
    assert_close(plan.page_width, A4_WIDTH);
    assert_close(plan.page_height, A4_HEIGHT);
}

#[test]
fn test_minimum_size_is_off_by_default() {
    let plan = plan(&text_grid(1, 1), &LayoutConfig::default());
    assert!(plan.page_width < A4_WIDTH);
    assert_close(plan.page_height, 80.0);
}

#[test]
fn test_geometry_with_pagination_uses_max_height() {
    let config = LayoutConfig {
        max_page_height: 500.0,
        ..LayoutConfig::default()
    }
    .paginated();
    let geometry = PageGeometry::compute(2, 100.0, &config);
    assert_close(geometry.height, 500.0);
    assert!(geometry.paginate);
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_cells_tile_each_row() {
    let sheet = text_grid(4, 3);
    let config = LayoutConfig::default();
    let widths = widths_for(&sheet, &config);
    let layout = plan_layout(&sheet, &MergeMap::default(), &widths, &config);

    for row in 1..=4u32 {
        let cells: Vec<_> = layout.cells().filter(|c| c.row == row).collect();
        assert_eq!(cells.len(), 3);
        assert_close(cells[0].rect.x, 30.0);
        for pair in cells.windows(2) {
            assert_close(pair[0].rect.right(), pair[1].rect.x);
        }
        assert_close(cells[2].rect.right(), 30.0 + widths.total());
        assert!(cells.iter().all(|c| c.rect.y == 30.0 + f64::from(row - 1) * 20.0));
    }
}
