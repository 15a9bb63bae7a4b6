//! Merged regions through the full pipeline.
//!
//! A merge is drawn once, by its top-left anchor, across the combined width
//! of its columns and the combined height of its rows. Covered cells keep
//! their column slots but draw nothing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_close, fill_rects, find_text, plan_default, text_draws};
use fixtures::{SheetBuilder, StyleBuilder};
use xlplan::cell_ref::parse_range;
use xlplan::layout::{MergeMap, MergeMembership};
use xlplan::{FontVariant, MergeRegion, RenderContext};

// ============================================================================
// BASIC MERGES
// ============================================================================

#[test]
fn test_simple_2x2_merge() {
    let sheet = SheetBuilder::new()
        .cell("A1", "Merged Header", None)
        .cell("B1", "covered", None)
        .cell("B2", "also covered", None)
        .cell("C1", "x", None)
        .cell("C2", "y", None)
        .merge("A1:B2")
        .build();
    let plan = plan_default(&sheet);

    let texts: Vec<_> = text_draws(&plan).into_iter().map(|d| d.text).collect();
    assert_eq!(texts, ["Merged Header", "x", "y"]);

    let header = find_text(&plan, "Merged Header");
    let x = find_text(&plan, "x");
    // Header box runs from A's left padding to B's right padding, so column
    // C's box starts one full padding later.
    assert_close(header.x + header.width + 10.0, x.x);
    // Vertically centered in two rows.
    assert_close(header.y, 30.0 + (40.0 - 11.0) / 2.0);
}

#[test]
fn test_merge_fill_covers_all_rows() {
    let sheet = SheetBuilder::new()
        .cell("A1", "Band", Some(StyleBuilder::new().fill("#DDEEFF").build()))
        .size(3, 2)
        .merge("A1:B3")
        .build();
    let plan = plan_default(&sheet);
    let fills = fill_rects(&plan);
    assert_eq!(fills.len(), 1);
    let (rect, color) = &fills[0];
    assert_eq!(color, "#DDEEFF");
    assert_close(rect.height, 60.0);
    assert_close(rect.width, plan.page_width - 60.0);
}

// ============================================================================
// WIDTH DEFICIT
// ============================================================================

#[test]
fn test_wide_title_spreads_over_spanned_columns() {
    let title = "Quarterly Revenue Summary For All Regions";
    let sheet = SheetBuilder::new()
        .cell("A1", title, None)
        .cell("A2", "a", None)
        .cell("B2", "b", None)
        .cell("C2", "c", None)
        .merge("A1:C1")
        .build();
    let plan = plan_default(&sheet);

    let mut ctx = RenderContext::new();
    let required = ctx.measure_text(title, FontVariant::Regular, 11.0) + 20.0;
    assert_close(plan.page_width - 60.0, required);

    // Deficit is split evenly, so the three single-letter boxes are equal.
    let widths: Vec<_> = text_draws(&plan)
        .into_iter()
        .skip(1)
        .map(|d| d.width)
        .collect();
    assert_eq!(widths.len(), 3);
    assert_close(widths[0], widths[1]);
    assert_close(widths[1], widths[2]);
    assert_close(widths.iter().sum::<f64>() + 30.0, required);
}

#[test]
fn test_merge_narrower_than_columns_adds_nothing() {
    let with_merge = SheetBuilder::new()
        .cell("A1", "hi", None)
        .cell("A2", "a much longer first column", None)
        .cell("B2", "and a second one", None)
        .merge("A1:B1")
        .build();
    let mut without_merge = with_merge.clone();
    without_merge.merges.clear();

    assert_close(
        plan_default(&with_merge).page_width,
        plan_default(&without_merge).page_width,
    );
}

// ============================================================================
// MALFORMED REGIONS
// ============================================================================

#[test]
fn test_reversed_range_is_normalized() {
    let region = parse_range("C3:A1").unwrap();
    assert_eq!(region, MergeRegion::new(1, 1, 3, 3));

    let sheet = SheetBuilder::new()
        .cell("A1", "anchor", None)
        .cell("C3", "covered", None)
        .merge("C3:A1")
        .build();
    let texts: Vec<_> = text_draws(&plan_default(&sheet))
        .into_iter()
        .map(|d| d.text)
        .collect();
    assert_eq!(texts, ["anchor"]);
}

#[test]
fn test_overlapping_merges_last_write_wins() {
    let sheet = SheetBuilder::new()
        .cell("A1", "first", None)
        .cell("B2", "second", None)
        .size(3, 3)
        .merge("A1:B2")
        .merge("B2:C3")
        .build();

    let map = MergeMap::build(&sheet.merges, &sheet.grid);
    assert!(matches!(
        map.membership(2, 2),
        Some(MergeMembership::Anchor(r)) if r.bottom_row == 3
    ));

    // B2 was covered by the first region but anchors the second.
    let texts: Vec<_> = text_draws(&plan_default(&sheet))
        .into_iter()
        .map(|d| d.text)
        .collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn test_merge_past_grid_edge() {
    let sheet = SheetBuilder::new()
        .cell("A1", "edge", None)
        .cell("B1", "x", None)
        .merge("B1:F1")
        .build();
    let plan = plan_default(&sheet);
    let x = find_text(&plan, "x");
    // Only column B exists, so the merged box ends at the table edge.
    assert_close(x.x + x.width + 5.0, plan.page_width - 30.0);
}

#[test]
fn test_sheet_sized_merge_on_small_grid() {
    let region = parse_range("A1:XFD1048576").unwrap();
    let sheet = SheetBuilder::new()
        .cell("A1", "everything", Some(StyleBuilder::new().fill("#DDEEFF").build()))
        .cell("B2", "hidden", None)
        .merge("A1:XFD1048576")
        .build();

    let map = MergeMap::build(&sheet.merges, &sheet.grid);
    assert_eq!(map.len(), 4);
    assert_eq!(map.membership(1, 1), Some(&MergeMembership::Anchor(region)));
    assert!(map.is_secondary(2, 2));

    let plan = plan_default(&sheet);
    let texts: Vec<_> = text_draws(&plan).into_iter().map(|d| d.text).collect();
    assert_eq!(texts, ["everything"]);

    let fills = fill_rects(&plan);
    assert_eq!(fills.len(), 1);
    assert_close(fills[0].0.width, plan.page_width - 60.0);
    assert_close(fills[0].0.height, 40.0);
}
