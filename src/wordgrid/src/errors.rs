//! Error types for placement and candidate intake.
//!
//! Words that cannot be fit into the grid are not errors; they are reported through
//! [`Placement::unplaced`](crate::Placement::unplaced). The variants here cover malformed input
//! only.

use std::io;

/// Rejected arguments to [`place_words`](crate::place_words).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("No candidate words to place")]
    EmptyCandidateList,

    #[error("Grid size must be between 1 and {max}, got {0}", max = crate::MAX_GRID_SIZE)]
    InvalidGridSize(usize),

    #[error("Placement limit must be at least 1, got {0}")]
    InvalidMaxPlacements(usize),
}

/// Failure to read candidate words out of a model response.
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("No JSON object found in response text")]
    NoJsonFound,

    #[error("Malformed candidate JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for the command-line tool.
#[derive(Debug, thiserror::Error)]
pub enum WordgridError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Candidates(#[from] CandidateError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write placement as JSON: {0}")]
    Output(serde_json::Error),
}
