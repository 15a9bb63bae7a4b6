//! Data types for sheet layout: the decoded input grid and the paint plan output.

mod cell;
mod grid;
mod image;
mod paint;
mod rich_text;
mod style;

pub use cell::*;
pub use grid::*;
pub use image::*;
pub use paint::*;
pub use rich_text::*;
pub use style::*;
