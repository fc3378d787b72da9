use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ArrangeError {
    #[error("rectangle {id:?} has an invalid size {width}x{height}")]
    /// A rectangle was zero-sized, negative or not finite. Packing such a rectangle
    /// would never terminate, so it is rejected before packing starts.
    InvalidSize {
        id: Option<String>,
        width: Pt,
        height: Pt,
    },

    #[error("aspect ratio must be finite and positive, got {0}")]
    /// The target aspect ratio can't be used to size a bounding rectangle
    InvalidRatio(f64),

    #[error("growth factor must be finite and positive, got {0}")]
    /// A non-positive growth factor would retry the same trial rectangle forever
    InvalidGrowth(f64),

    #[error("column flow needs at least one column")]
    InvalidColumnCount,

    #[error("arrangeable already has a child named {0:?}")]
    DuplicateChild(String),

    #[error("row {index} is out of bounds (matrix has {rows} rows)")]
    /// A row index did not name an existing grid row
    RowOutOfBounds { index: usize, rows: usize },

    #[error("column {index} is out of bounds (matrix has {columns} columns)")]
    /// A column index did not name an existing grid column
    ColumnOutOfBounds { index: usize, columns: usize },

    #[error("can't split extent {extent} of grid line {index} at {at}")]
    /// A split position was not strictly inside the row or column being split
    InvalidSplit { index: usize, at: Pt, extent: Pt },

    #[error("point ({x}, {y}) lies outside the matrix")]
    PointOutOfBounds { x: Pt, y: Pt },

    #[error("cell at column {column}, row {row} is already occupied")]
    /// A placement would have overwritten another rectangle
    CellOccupied { column: usize, row: usize },

    #[error("no free space for a {width}x{height} rectangle")]
    /// Recoverable: the current trial matrix has no free rectangle large enough
    PlacementNotFound { width: Pt, height: Pt },

    #[error("placement runs past the edge of the matrix")]
    /// Recoverable: a strict placement ran out of rows or columns
    PlacementOverflow,

    #[error("gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },

    #[error("no font registered for family {family:?} (bold: {bold})")]
    UnknownFont { family: String, bold: bool },

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),
}

impl ArrangeError {
    /// Whether the packing driver should answer this error by growing the trial
    /// bounding rectangle and trying again. Every other error aborts packing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ArrangeError::PlacementNotFound { .. } | ArrangeError::PlacementOverflow
        )
    }
}
