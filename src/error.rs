use thiserror::Error;

use crate::grid::Coord;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The input does not have the shape a solver expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("input contains no rows")]
    Empty,

    #[error("expected every row to be {expected} cells wide, but row {row} has {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid character {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },

    #[error("input has no start cell")]
    MissingStart,

    #[error("no module named {0:?}")]
    MissingModule(String),

    #[error("malformed line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{coord:?} lies outside the {height}x{width} grid")]
    OutOfBounds {
        coord: Coord,
        height: usize,
        width: usize,
    },

    #[error("no closed loop passes through the start cell at {0:?}")]
    NoLoopFound(Coord),

    #[error("no path from {from:?} to {to:?} satisfies the movement rules")]
    Unreachable { from: Coord, to: Coord },

    #[error("{steps} steps exceed the tiled search limit of {limit}")]
    StepLimit { steps: usize, limit: usize },

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("arithmetic overflow")]
    Overflow,
}
