//! Layout stages: merge membership, column widths and page placement.
//!
//! Each stage takes the previous stage's output by reference and returns a new
//! value:
//! - [`MergeMap::build`] expands merged regions into per-cell membership
//! - [`solve_column_widths`] sizes columns from measured display text
//! - [`plan_layout`] sizes pages and places rows, cells and images

mod column_widths;
mod merge_map;
mod page_layout;

pub use column_widths::{solve_column_widths, ColumnWidths};
pub use merge_map::{MergeMap, MergeMembership};
pub use page_layout::{
    plan_layout, PageGeometry, PageLayout, PlacedCell, PlacedImage, PlacementState, PlannedPage,
    RowOrigin, PX_TO_PT,
};
