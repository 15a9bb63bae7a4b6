//! Per-cell merge membership.

use std::collections::HashMap;

use crate::types::{Grid, MergeRegion};

/// How a cell participates in a merged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMembership {
    /// Top-left cell; the only cell of the region that is drawn.
    Anchor(MergeRegion),
    /// Covered by the region but drawn by its anchor.
    Secondary(MergeRegion),
}

impl MergeMembership {
    pub fn region(&self) -> &MergeRegion {
        match self {
            Self::Anchor(region) | Self::Secondary(region) => region,
        }
    }
}

/// Merge membership lookup by 1-based (row, col).
#[derive(Debug, Clone, Default)]
pub struct MergeMap {
    cells: HashMap<(u32, u32), MergeMembership>,
}

impl MergeMap {
    /// Expand merge regions into per-cell entries for the cells of `grid`.
    ///
    /// Only covered cells that exist in the grid get an entry; each entry
    /// still carries the full region. Regions are expected not to overlap.
    /// When they do, the later region in `regions` wins for every cell it
    /// covers; the overwrite is logged.
    pub fn build(regions: &[MergeRegion], grid: &Grid) -> Self {
        let last_row = u32::try_from(grid.total_rows()).unwrap_or(u32::MAX);
        let last_col = u32::try_from(grid.total_cols()).unwrap_or(u32::MAX);

        let mut cells = HashMap::new();
        for region in regions.iter().map(|r| r.normalized()) {
            for r in region.top_row..=region.bottom_row.min(last_row) {
                for c in region.left_col..=region.right_col.min(last_col) {
                    let membership = if region.is_anchor(r, c) {
                        MergeMembership::Anchor(region)
                    } else {
                        MergeMembership::Secondary(region)
                    };
                    if let Some(previous) = cells.insert((r, c), membership) {
                        log::warn!(
                            "merge regions overlap at {}: {:?} replaces {:?}",
                            crate::cell_ref::encode(r, c),
                            region,
                            previous.region()
                        );
                    }
                }
            }
        }
        Self { cells }
    }

    /// Membership of a cell, `None` when it is not merged.
    pub fn membership(&self, row: u32, col: u32) -> Option<&MergeMembership> {
        self.cells.get(&(row, col))
    }

    pub fn is_secondary(&self, row: u32, col: u32) -> bool {
        matches!(self.membership(row, col), Some(MergeMembership::Secondary(_)))
    }

    /// The region anchored at this cell, if any.
    pub fn anchor_region(&self, row: u32, col: u32) -> Option<&MergeRegion> {
        match self.membership(row, col) {
            Some(MergeMembership::Anchor(region)) => Some(region),
            _ => None,
        }
    }

    /// Number of covered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(u32, u32), &MergeMembership)> {
        self.cells.iter()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::new(vec![vec![Cell::default(); cols]; rows])
    }

    #[test]
    fn test_region_cells() {
        let region = MergeRegion::new(2, 2, 3, 4);
        let map = MergeMap::build(&[region], &grid(5, 5));

        assert_eq!(map.len(), 6);
        assert_eq!(map.membership(2, 2), Some(&MergeMembership::Anchor(region)));

        let secondaries: Vec<_> = map
            .iter()
            .filter(|(_, m)| matches!(m, MergeMembership::Secondary(r) if *r == region))
            .collect();
        assert_eq!(secondaries.len(), 5);

        assert!(map.is_secondary(3, 4));
        assert!(map.is_secondary(2, 3));
        assert!(!map.is_secondary(2, 2));
        assert_eq!(map.membership(1, 1), None);
        assert_eq!(map.membership(4, 2), None);
    }

    #[test]
    fn test_anchor_region() {
        let map = MergeMap::build(&[MergeRegion::new(1, 1, 1, 3)], &grid(1, 3));
        assert_eq!(map.anchor_region(1, 1).unwrap().col_span(), 3);
        assert!(map.anchor_region(1, 2).is_none());
    }

    #[test]
    fn test_overlap_last_write_wins() {
        let first = MergeRegion::new(1, 1, 2, 2);
        let second = MergeRegion::new(2, 2, 3, 3);
        let map = MergeMap::build(&[first, second], &grid(3, 3));

        // (2,2) was secondary in the first region and becomes the second's anchor
        assert_eq!(map.membership(2, 2), Some(&MergeMembership::Anchor(second)));
        assert_eq!(map.membership(1, 1), Some(&MergeMembership::Anchor(first)));
        assert_eq!(map.membership(1, 2), Some(&MergeMembership::Secondary(first)));
        assert_eq!(map.membership(3, 3), Some(&MergeMembership::Secondary(second)));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_reversed_region_is_normalized() {
        let reversed = MergeRegion {
            top_row: 3,
            left_col: 4,
            bottom_row: 2,
            right_col: 2,
        };
        let map = MergeMap::build(&[reversed], &grid(3, 4));
        assert_eq!(
            map.membership(2, 2),
            Some(&MergeMembership::Anchor(MergeRegion::new(2, 2, 3, 4)))
        );
    }

    #[test]
    fn test_region_is_clipped_to_grid() {
        let huge = MergeRegion::new(1, 1, 1_048_576, 16_384);
        let map = MergeMap::build(&[huge], &grid(2, 3));

        assert_eq!(map.len(), 6);
        assert_eq!(map.membership(1, 1), Some(&MergeMembership::Anchor(huge)));
        assert_eq!(map.membership(2, 3), Some(&MergeMembership::Secondary(huge)));
        assert_eq!(map.membership(3, 1), None);
    }

    #[test]
    fn test_region_outside_grid_is_ignored() {
        let map = MergeMap::build(&[MergeRegion::new(4, 4, 6, 6)], &grid(3, 3));
        assert!(map.is_empty());
    }

    #[test]
    fn test_empty() {
        let map = MergeMap::build(&[], &grid(2, 2));
        assert!(map.is_empty());
    }
}
