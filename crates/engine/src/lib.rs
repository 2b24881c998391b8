//! Session layer for the candy-matching game
//!
//! Wraps the pure [`candy_match_core`] simulation with the pieces a running
//! game needs: configuration, a paced [`GameSession`] that releases board
//! events at presentation speed, JSON persistence of level progress and a
//! serializable [`SessionSnapshot`].
//!
//! # Example
//!
//! ```
//! use candy_match_engine::{GameConfig, GameSession, MoveResult};
//!
//! let config = GameConfig { seed: Some(3), ..GameConfig::default() }.instant();
//! let mut session = GameSession::from_config(config).unwrap();
//!
//! if let Some((a, b)) = session.hint() {
//!     let result = session.try_swap(a, b).unwrap();
//!     assert!(result.is_accepted());
//!     assert_eq!(session.progress().moves_remaining(), 29);
//! }
//! ```

pub use candy_match_core as core;
pub use candy_match_types as types;

pub mod config;
pub mod error;
pub mod file_store;
pub mod session;
pub mod snapshot;

pub use config::{ConfigError, GameConfig};
pub use error::SessionError;
pub use file_store::JsonFileStore;
pub use session::{GameSession, MoveResult, Phase, RejectReason};
pub use snapshot::SessionSnapshot;
