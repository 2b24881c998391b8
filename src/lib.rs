//! Candy match (workspace facade crate).
//!
//! Re-exports the workspace crates as `candy_match::{types, core, engine}` so
//! the binary and the integration tests share one import path.

pub use candy_match_core as core;
pub use candy_match_engine as engine;
pub use candy_match_types as types;
