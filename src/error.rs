//! Error type shared by the board model, the move applicator and the puzzle parser.

use crate::moves::Move;
use thiserror::Error;

/// Everything that can go wrong while building or transforming a puzzle.
///
/// Running out of frontier during a search is *not* an error: strategies report
/// it as a `SolutionResult` with `solved == false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Bad piece geometry or exit placement found while building the piece model.
    #[error("malformed puzzle: {0}")]
    MalformedPuzzle(String),

    /// A move referenced a symbol that is not a movable piece on the board.
    #[error("piece '{0}' not found")]
    UnknownPiece(char),

    /// A move would leave the grid or run into another piece.
    ///
    /// The move generator only emits legal moves, so seeing this from a search
    /// means the generator and the applicator disagree.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: String },

    /// The textual puzzle description (or a CLI value) could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
