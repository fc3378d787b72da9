//! Grid-based rectangle packing for laying out blocks of content on a page.
//!
//! Rectangles are packed into a bounding rectangle of a target aspect ratio
//! using an [AreaMatrix]: a grid of free / occupied cells whose rows and columns
//! are split on demand so that every placed rectangle lands exactly on grid lines.
//! When a trial bounding rectangle is too small, it is grown and packing starts
//! over. Composite [Arrangeable]s pack their children first and then pack the
//! children's footprints together with their own rectangles, so whole layouts can
//! be nested inside one another.
//!
//! Finished layouts can be drawn as SVG or as a single-page PDF with
//! [render::write_svg] and [render::write_pdf].

mod arrange;
pub use arrange::*;

mod arrangeable;
pub use arrangeable::*;

mod colour;
pub use colour::*;

mod error;
pub use error::*;

pub mod matrix;
pub use matrix::{AreaMatrix, PlacementMode};

pub mod markup;

mod measure;
pub use measure::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

pub mod render;

mod units;
pub use units::*;
