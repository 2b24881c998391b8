//! Session configuration
//!
//! Defaults give the standard board: 5x10 cells, five candy kinds, 30
//! moves, a one-second swap and half-second cascade passes.
//!
//! # Environment Variables
//!
//! - `CANDY_WIDTH` / `CANDY_HEIGHT`: grid size (default 5 x 10)
//! - `CANDY_KINDS`: number of candy kinds, 3..=7 (default 5)
//! - `CANDY_MOVES`: move budget per attempt (default 30)
//! - `CANDY_SEED`: board seed (default: random)
//! - `CANDY_SWAP_MS`: swap presentation time (default 1000)
//! - `CANDY_SETTLE_MS`: cascade pass presentation time (default 500)
//! - `CANDY_SPACING`: world units between cells (default 0.7)
//! - `CANDY_SAVE_PATH`: JSON progress file (default: in-memory only)

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{
    TokenType, CASCADE_SETTLE_MS, DEFAULT_CELL_SPACING, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH,
    DEFAULT_PALETTE_SIZE, INITIAL_MOVES, MIN_PALETTE_SIZE, SWAP_ANIMATION_MS,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("candy kinds must be between {min} and {max}, got {got}")]
    TokenKinds { got: usize, min: usize, max: usize },

    #[error("cell spacing must be a positive number, got {0}")]
    Spacing(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub token_kinds: usize,
    pub initial_moves: u32,
    pub seed: Option<u64>,
    pub swap_ms: u32,
    pub settle_ms: u32,
    pub spacing: f32,
    pub save_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            token_kinds: DEFAULT_PALETTE_SIZE,
            initial_moves: INITIAL_MOVES,
            seed: None,
            swap_ms: SWAP_ANIMATION_MS,
            settle_ms: CASCADE_SETTLE_MS,
            spacing: DEFAULT_CELL_SPACING,
            save_path: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();

        let save_path = lookup("CANDY_SAVE_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            width: parsed(&lookup, "CANDY_WIDTH").unwrap_or(defaults.width),
            height: parsed(&lookup, "CANDY_HEIGHT").unwrap_or(defaults.height),
            token_kinds: parsed(&lookup, "CANDY_KINDS").unwrap_or(defaults.token_kinds),
            initial_moves: parsed(&lookup, "CANDY_MOVES").unwrap_or(defaults.initial_moves),
            seed: parsed(&lookup, "CANDY_SEED"),
            swap_ms: parsed(&lookup, "CANDY_SWAP_MS").unwrap_or(defaults.swap_ms),
            settle_ms: parsed(&lookup, "CANDY_SETTLE_MS").unwrap_or(defaults.settle_ms),
            spacing: parsed(&lookup, "CANDY_SPACING").unwrap_or(defaults.spacing),
            save_path,
        }
    }

    /// Presentation pacing off: every frame is released immediately
    pub fn instant(mut self) -> Self {
        self.swap_ms = 0;
        self.settle_ms = 0;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_PALETTE_SIZE..=TokenType::COUNT).contains(&self.token_kinds) {
            return Err(ConfigError::TokenKinds {
                got: self.token_kinds,
                min: MIN_PALETTE_SIZE,
                max: TokenType::COUNT,
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(ConfigError::Spacing(self.spacing));
        }
        Ok(())
    }

    /// Tokens used by this configuration
    pub fn palette(&self) -> &'static [TokenType] {
        TokenType::palette(self.token_kinds)
    }
}
