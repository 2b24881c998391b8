//! Progress tracker - moves, score, goal and level
//!
//! The tracker listens to the grid engine through [`ProgressListener`] and
//! decides when an attempt is won or lost. It never touches the grid.
//!
//! - A win fires as soon as the score reaches the goal, even with moves left.
//! - A loss fires when the last move is spent below the goal.
//! - The last move's own cascade can still turn a loss into a win.
//! - Each fires at most once per attempt; a win is final.

use tracing::info;

use crate::error::StoreError;
use crate::grid_engine::ProgressListener;
use crate::scoring::next_score_to_win;
use crate::store::{get_u32_or, ProgressStore};
use crate::types::{
    GameStatus, DEFAULT_LEVEL, DEFAULT_SCORE_TO_WIN, LEVEL_KEY, SCORE_TO_WIN_KEY,
};

/// Notifications for the scene/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Won { score: u32, level: u32 },
    Lost { score: u32, level: u32 },
    LevelAdvanced { level: u32, score_to_win: u32 },
    Retried { level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    moves_remaining: u32,
    initial_moves: u32,
    score: u32,
    score_to_win: u32,
    level: u32,
    status: GameStatus,
    events: Vec<ProgressEvent>,
}

impl ProgressTracker {
    /// Fresh tracker at level 1 with the default goal
    pub fn new(initial_moves: u32) -> Self {
        Self::with_goal(initial_moves, DEFAULT_LEVEL, DEFAULT_SCORE_TO_WIN)
    }

    pub fn with_goal(initial_moves: u32, level: u32, score_to_win: u32) -> Self {
        Self {
            moves_remaining: initial_moves,
            initial_moves,
            score: 0,
            score_to_win,
            level,
            status: GameStatus::Playing,
            events: Vec::new(),
        }
    }

    /// Start a level from persisted values (level 1 and 300 when absent)
    pub fn load(store: &dyn ProgressStore, initial_moves: u32) -> Self {
        let level = get_u32_or(store, LEVEL_KEY, DEFAULT_LEVEL);
        let score_to_win = get_u32_or(store, SCORE_TO_WIN_KEY, DEFAULT_SCORE_TO_WIN);
        info!(level, score_to_win, "progress loaded");
        Self::with_goal(initial_moves, level, score_to_win)
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn initial_moves(&self) -> u32 {
        self.initial_moves
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn score_to_win(&self) -> u32 {
        self.score_to_win
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    /// Take and clear pending notifications
    pub fn take_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spend one move; never goes below zero
    pub fn use_move(&mut self) {
        if self.moves_remaining == 0 {
            return;
        }
        self.moves_remaining -= 1;

        if self.moves_remaining == 0 {
            self.check_lose();
        }
    }

    /// Add points and check the goal
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.check_win();
    }

    fn check_win(&mut self) {
        if self.status != GameStatus::Won && self.score >= self.score_to_win {
            self.status = GameStatus::Won;
            info!(score = self.score, level = self.level, "level won");
            self.events.push(ProgressEvent::Won {
                score: self.score,
                level: self.level,
            });
        }
    }

    fn check_lose(&mut self) {
        if self.status == GameStatus::Playing && self.score < self.score_to_win {
            self.status = GameStatus::Lost;
            info!(score = self.score, level = self.level, "level lost");
            self.events.push(ProgressEvent::Lost {
                score: self.score,
                level: self.level,
            });
        }
    }

    /// Move to the next level, raise the goal and persist both
    ///
    /// The new level starts with a zero score and a full move budget.
    pub fn advance_level(&mut self, store: &mut dyn ProgressStore) -> Result<u32, StoreError> {
        self.level = self.level.saturating_add(1);
        self.score_to_win = next_score_to_win(self.score_to_win);

        store.set_int(LEVEL_KEY, i64::from(self.level));
        store.set_int(SCORE_TO_WIN_KEY, i64::from(self.score_to_win));
        store.flush()?;

        self.reset_attempt();
        info!(
            level = self.level,
            score_to_win = self.score_to_win,
            "advanced to next level"
        );
        self.events.push(ProgressEvent::LevelAdvanced {
            level: self.level,
            score_to_win: self.score_to_win,
        });
        Ok(self.level)
    }

    /// Restart the current level; goal and level stay as they are
    pub fn retry(&mut self) {
        self.reset_attempt();
        info!(level = self.level, "level restarted");
        self.events.push(ProgressEvent::Retried { level: self.level });
    }

    fn reset_attempt(&mut self) {
        self.score = 0;
        self.moves_remaining = self.initial_moves;
        self.status = GameStatus::Playing;
    }
}

impl ProgressListener for ProgressTracker {
    fn use_move(&mut self) {
        ProgressTracker::use_move(self);
    }

    fn add_score(&mut self, points: u32) {
        ProgressTracker::add_score(self, points);
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(crate::types::INITIAL_MOVES)
    }
}
