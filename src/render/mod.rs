//! Drawing packed layouts, either as SVG for quick inspection or as a single-page PDF

mod pdf;
pub use pdf::*;

mod svg;
pub use svg::*;
