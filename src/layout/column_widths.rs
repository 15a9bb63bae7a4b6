//! Column width solving from measured cell text.

use crate::cell_text::DisplayGrid;
use crate::config::LayoutConfig;
use crate::render::RenderContext;
use crate::types::{Grid, MergeRegion};

use super::MergeMap;

/// Final width of every column, in points. Index 0 is column 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnWidths {
    widths: Vec<f64>,
}

impl ColumnWidths {
    pub fn from_vec(widths: Vec<f64>) -> Self {
        Self { widths }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.widths
    }

    /// Width of a 1-based column (0 outside the grid).
    pub fn width(&self, col: u32) -> f64 {
        column_index(col)
            .and_then(|i| self.widths.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of widths of 1-based columns `left..=right`, clipped to the grid.
    pub fn span_width(&self, left: u32, right: u32) -> f64 {
        (left..=right.min(self.last_col())).map(|c| self.width(c)).sum()
    }

    /// Sum of widths of the columns before a 1-based column.
    pub fn offset(&self, col: u32) -> f64 {
        (1..col.min(self.last_col().saturating_add(1)))
            .map(|c| self.width(c))
            .sum()
    }

    fn last_col(&self) -> u32 {
        u32::try_from(self.widths.len()).unwrap_or(u32::MAX)
    }

    /// Full table width.
    pub fn total(&self) -> f64 {
        self.widths.iter().sum()
    }
}

fn column_index(col: u32) -> Option<usize> {
    usize::try_from(col).ok()?.checked_sub(1)
}

/// Compute column widths in one row-major pass.
///
/// Every column starts at `padding`. Each drawn cell requires its measured
/// text width plus `padding + extra_space`. A plain cell raises its column to
/// that requirement; a merge anchor spreads any shortfall of its spanned
/// columns evenly across them. Widths only ever grow and the pass is not
/// repeated, so an early merge can leave columns wider than a later cell
/// strictly needs.
pub fn solve_column_widths(
    grid: &Grid,
    texts: &DisplayGrid,
    merges: &MergeMap,
    ctx: &mut RenderContext,
    config: &LayoutConfig,
) -> ColumnWidths {
    let mut widths = vec![config.padding; grid.total_cols()];

    for (row, col, cell) in grid.iter_cells() {
        if merges.is_secondary(row, col) {
            continue;
        }
        let text = texts.text(row, col);
        let size = cell.style.font_size_or(config.default_font_size);
        let required = ctx.measure_text(text, cell.style.font_variant(), size)
            + config.padding
            + config.extra_space;

        match merges.anchor_region(row, col) {
            Some(region) => widen_span(&mut widths, region, required),
            None => {
                if let Some(w) = column_index(col).and_then(|i| widths.get_mut(i)) {
                    *w = w.max(required);
                }
            }
        }
    }

    log::debug!(
        "solved {} column widths, table width {:.2}pt",
        widths.len(),
        widths.iter().sum::<f64>()
    );
    ColumnWidths { widths }
}

/// Spread the shortfall of a merged span evenly over its columns.
///
/// Columns of the region that fall outside the grid are ignored, so the
/// deficit is split over the columns that exist.
fn widen_span(widths: &mut [f64], region: &MergeRegion, required: f64) {
    let Some(start) = column_index(region.left_col) else {
        return;
    };
    let end = column_index(region.right_col)
        .map_or(start, |e| e.min(widths.len().saturating_sub(1)));
    let Some(span) = widths.get_mut(start..=end) else {
        return;
    };
    if span.is_empty() {
        return;
    }

    let merged: f64 = span.iter().sum();
    if merged < required {
        let share = (required - merged) / span.len() as f64;
        for w in span.iter_mut() {
            *w += share;
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::cell_text::DisplayGrid;
    use crate::render::{FontRegistry, TextMeasurer};
    use crate::types::{Cell, CellStyle, FontVariant};

    /// One point per character, independent of font.
    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn text_width(&self, text: &str, _font: FontVariant, _size: f64) -> f64 {
            text.chars().count() as f64
        }
    }

    fn ctx() -> RenderContext {
        RenderContext::with_measurer(FontRegistry::standard(), Box::new(FixedWidth))
    }

    fn config() -> LayoutConfig {
        LayoutConfig {
            padding: 4.0,
            extra_space: 6.0,
            ..LayoutConfig::default()
        }
    }

    fn solve(grid: &Grid, merges: &[MergeRegion]) -> ColumnWidths {
        let config = config();
        let texts = DisplayGrid::resolve(grid, config.fixed_decimal_places);
        solve_column_widths(grid, &texts, &MergeMap::build(merges, grid), &mut ctx(), &config)
    }

    #[test]
    fn test_plain_cells_take_max() {
        let grid = Grid::new(vec![
            vec![Cell::text("abc"), Cell::text("")],
            vec![Cell::text("abcdefgh"), Cell::text("x")],
        ]);
        let widths = solve(&grid, &[]);
        assert_eq!(widths.as_slice(), &[18.0, 11.0]);
        assert_eq!(widths.total(), 29.0);
    }

    #[test]
    fn test_empty_grid() {
        let widths = solve(&Grid::new(Vec::new()), &[]);
        assert!(widths.is_empty());
        assert_eq!(widths.total(), 0.0);
    }

    #[test]
    fn test_spans_and_offsets_stop_at_last_column() {
        let widths = ColumnWidths::from_vec(vec![10.0, 20.0]);
        assert_eq!(widths.span_width(2, u32::MAX), 20.0);
        assert_eq!(widths.span_width(3, 16_384), 0.0);
        assert_eq!(widths.offset(u32::MAX), 30.0);
        assert_eq!(widths.offset(2), 10.0);
        assert_eq!(widths.total(), 30.0);
    }

    #[test]
    fn test_merge_deficit_is_split_evenly() {
        // Anchor needs 40 + 10 = 50 over three columns that start at 4 each.
        let grid = Grid::new(vec![vec![
            Cell::text("x".repeat(40)),
            Cell::default(),
            Cell::default(),
        ]]);
        let widths = solve(&grid, &[MergeRegion::new(1, 1, 1, 3)]);
        let spanned = widths.span_width(1, 3);
        assert!((spanned - 50.0).abs() < 1e-9);
        for w in widths.as_slice() {
            assert!((w - 50.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_merge_within_existing_width_is_unchanged() {
        let grid = Grid::new(vec![
            vec![Cell::text("x".repeat(30)), Cell::text("y".repeat(30))],
            vec![Cell::text("short"), Cell::default()],
        ]);
        let widths = solve(&grid, &[MergeRegion::new(2, 1, 2, 2)]);
        assert_eq!(widths.as_slice(), &[40.0, 40.0]);
    }

    #[test]
    fn test_single_pass_keeps_early_merge_growth() {
        // Row 1 merge forces both columns to 30; row 2's plain cell needs 35 in
        // column 1 only. No second pass shrinks column 2 back.
        let grid = Grid::new(vec![
            vec![Cell::text("x".repeat(50)), Cell::default()],
            vec![Cell::text("y".repeat(25)), Cell::text("z")],
        ]);
        let widths = solve(&grid, &[MergeRegion::new(1, 1, 1, 2)]);
        assert_eq!(widths.as_slice(), &[35.0, 30.0]);
    }

    #[test]
    fn test_secondary_cells_are_not_measured() {
        let grid = Grid::new(vec![vec![Cell::text("a"), Cell::text("x".repeat(100))]]);
        let widths = solve(&grid, &[MergeRegion::new(1, 1, 1, 2)]);
        assert!(widths.total() < 30.0);
    }

    #[test]
    fn test_merge_past_grid_edge_uses_existing_columns() {
        let grid = Grid::new(vec![vec![Cell::text("x".repeat(20)), Cell::default()]]);
        let widths = solve(&grid, &[MergeRegion::new(1, 1, 1, 5)]);
        assert_eq!(widths.len(), 2);
        assert!((widths.total() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_font_size_and_bold_flow_into_measurement() {
        let grid = Grid::new(vec![vec![Cell::text("Name").with_style(CellStyle::bold())]]);
        let config = LayoutConfig::default();
        let texts = DisplayGrid::resolve(&grid, 2);
        let mut ctx = RenderContext::new();
        let widths =
            solve_column_widths(&grid, &texts, &MergeMap::default(), &mut ctx, &config);
        let expected = ctx.measure_text("Name", FontVariant::Bold, 11.0) + 20.0;
        assert!((widths.width(1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_offsets() {
        let widths = ColumnWidths::from_vec(vec![10.0, 20.0, 30.0]);
        assert_eq!(widths.offset(1), 0.0);
        assert_eq!(widths.offset(3), 30.0);
        assert_eq!(widths.span_width(2, 3), 50.0);
        assert_eq!(widths.width(4), 0.0);
        assert_eq!(widths.width(0), 0.0);
    }
}
