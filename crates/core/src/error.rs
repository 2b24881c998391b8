//! Error types for the grid engine and progress persistence.
//!
//! Non-adjacent swaps are not errors; they come back as
//! [`SwapOutcome::Invalid`](crate::SwapOutcome::Invalid).

use thiserror::Error;

use crate::types::{Pos, TokenType};

/// Contract violations and internal-invariant failures of the grid engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds {
        pos: Pos,
        width: usize,
        height: usize,
    },

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("token palette is empty")]
    EmptyPalette,

    #[error("token {0:?} appears more than once in the palette")]
    DuplicateToken(TokenType),

    /// The cascade loop kept finding matches; this indicates a logic defect
    #[error("cascade did not stabilize after {passes} passes")]
    CascadeLimitExceeded { passes: u32 },
}

/// Failures reading or writing persisted progress
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt progress data: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
