use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{EngineError, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("progress store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot advance: the current level is not won")]
    NotWon,

    #[error("no board with a valid swap after {attempts} attempts")]
    Unplayable { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, SessionError>;
