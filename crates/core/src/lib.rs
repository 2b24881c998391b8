//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the grid simulation and the progress rules of the
//! candy-matching game. It has **zero dependencies** on rendering, audio,
//! input devices or file I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Every rule is observable through plain return values
//! - **Portable**: Runs headless, in a terminal, or behind any renderer
//!
//! # Module Structure
//!
//! - [`grid`]: width x height cell storage
//! - [`matcher`]: 3-window match detection and hint search
//! - [`grid_engine`]: board generation, swaps, rollback and the cascade loop
//! - [`progress`]: move budget, score, win/lose and level progression
//! - [`rng`]: seeded token selection
//! - [`scoring`]: per-group rewards and level goals
//! - [`store`]: persistence seam for level progress
//! - [`error`]: engine and store errors
//!
//! # Game Rules
//!
//! - **Generation**: no token may complete a run of three with the two cells to
//!   its left or the two cells below it
//! - **Swaps**: only orthogonal neighbours; every such swap costs a move
//! - **Rollback**: a swap that makes no match is undone
//! - **Cascade**: clear every match, refill the holes, repeat until stable
//! - **Scoring**: 30 points per detected 3-window
//!
//! # Example
//!
//! ```
//! use candy_match_core::{GridEngine, ProgressTracker, SwapOutcome, TokenRng};
//! use candy_match_types::{Pos, TokenType};
//!
//! let mut engine = GridEngine::new(5, 10, TokenType::palette(5), TokenRng::new(12345)).unwrap();
//! let mut progress = ProgressTracker::default();
//!
//! let outcome = engine.swap(Pos::new(0, 0), Pos::new(1, 0), &mut progress).unwrap();
//! assert!(outcome.is_accepted());
//! assert_eq!(progress.moves_remaining(), 29);
//! assert!(engine.is_stable());
//! ```

pub mod error;
pub mod grid;
pub mod grid_engine;
pub mod matcher;
pub mod progress;
pub mod rng;
pub mod scoring;
pub mod store;

pub use candy_match_types as types;

// Re-export commonly used types for convenience
pub use error::{EngineError, StoreError};
pub use grid::Grid;
pub use grid_engine::{
    candidates_at, CascadePass, CascadeReport, GridEngine, ProgressListener, SwapOutcome,
};
pub use matcher::{find_matches, find_valid_swap, has_match, MatchGroup, MatchScan};
pub use progress::{ProgressEvent, ProgressTracker};
pub use rng::TokenRng;
pub use store::{MemoryStore, ProgressStore};
