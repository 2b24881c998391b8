use serde::{Deserialize, Serialize};

use crate::core::{Grid, ProgressTracker};
use crate::session::Phase;

/// Serializable view of a session, rows listed bottom first
///
/// Cells hold [`TokenType::code`](crate::types::TokenType::code), `0` for empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<Vec<u8>>,
    pub score: u32,
    pub score_to_win: u32,
    pub moves_remaining: u32,
    pub level: u32,
    pub status: String,
    pub phase: String,
    pub seed: u64,
}

impl SessionSnapshot {
    pub fn capture(grid: &Grid, progress: &ProgressTracker, phase: Phase, seed: u64) -> Self {
        let rows = grid
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.map_or(0, |t| t.code())).collect())
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            rows,
            score: progress.score(),
            score_to_win: progress.score_to_win(),
            moves_remaining: progress.moves_remaining(),
            level: progress.level(),
            status: progress.status().as_str().to_string(),
            phase: phase.as_str().to_string(),
            seed,
        }
    }

    pub fn playable(&self) -> bool {
        self.status == "playing" && self.phase == "idle"
    }
}
