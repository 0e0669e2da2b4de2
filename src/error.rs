use thiserror::Error;

/// Errors raised by the puzzle engine.
///
/// None of these are fatal: a rejected move leaves the grid untouched and a
/// corrupt board is replaced by the solved one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The index is the empty cell, out of range, or not aligned with it.
    #[error("Tile at index {index} cannot slide")]
    InvalidMove { index: usize },

    /// A supplied board breaks the single-empty permutation invariant.
    #[error("Corrupt puzzle state: {reason}")]
    CorruptState { reason: String },

    /// A move arrived before the previous one finished animating.
    #[error("Previous move is still animating")]
    Animating,
}
