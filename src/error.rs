use thiserror::Error;

use crate::model::MAX_GRID_SIZE;

/// Errors raised while building a puzzle or loading its inputs.
///
/// A contradictory puzzle state is not an error: it is reported through
/// [`crate::game::PuzzleStatus::Contradiction`].
#[derive(Error, Debug)]
pub enum PuzzleError {
    /// Two sections running the same way were compared for an intersection.
    #[error("sections {first} and {second} share a direction and cannot intersect")]
    SameDirection { first: String, second: String },

    /// An intersection was built for sections that do not share exactly one cell.
    #[error("sections {horizontal} and {vertical} share {count} cells, expected exactly one")]
    SharedCellCount {
        horizontal: String,
        vertical: String,
        count: usize,
    },

    #[error("section starting at {origin} has {len} cell(s), at least two are required")]
    SectionTooShort { origin: String, len: usize },

    #[error("section {label} visits cell {position} more than once")]
    RepeatedPosition { label: String, position: String },

    #[error("section {label} does not continue in a straight line at cell {position}")]
    NotContiguous { label: String, position: String },

    #[error("a section labelled {0} already exists")]
    DuplicateSection(String),

    #[error("no section labelled {0}")]
    UnknownSection(String),

    #[error("candidate {0:?} is not a string of decimal digits")]
    InvalidCandidate(String),

    #[error("invalid position token {0:?}")]
    InvalidPosition(String),

    #[error("grid contains no rows")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid grid marker {token:?} at row {row}, column {col}")]
    InvalidMarker {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("grid of {rows}x{cols} cells exceeds the {max}x{max} coordinate alphabet", max = MAX_GRID_SIZE)]
    GridTooLarge { rows: usize, cols: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}
