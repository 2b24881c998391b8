//! Game session - the paced controller around the grid engine
//!
//! The grid engine resolves a swap completely and at once. The session keeps
//! the resulting [`EventFrame`]s in a queue and releases them over time, so a
//! renderer can animate the swap (`swap_ms`) and each cascade pass
//! (`settle_ms`). While frames are still playing the session is busy and new
//! swaps are rejected.
//!
//! ```text
//! Idle --try_swap--> Swapping --swap_ms--> Resolving --settle_ms per pass--> Idle
//!                        \--(no match) SwapBack --swap_ms--> Idle
//! ```

use std::collections::VecDeque;

use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::core::{
    find_valid_swap, Grid, GridEngine, MemoryStore, ProgressEvent, ProgressStore,
    ProgressTracker, SwapOutcome, TokenRng,
};
use crate::error::{Result, SessionError};
use crate::file_store::JsonFileStore;
use crate::snapshot::SessionSnapshot;
use crate::types::{EventFrame, FrameKind, GameStatus, GridEvent, Pos};

/// Dead boards dealt in a row before a session is declared unplayable
pub const MAX_RESHUFFLES: u32 = 100;

/// Presentation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Swap or swap-back is playing
    Swapping,
    /// Cascade passes (or a board fill) are playing
    Resolving,
}

impl Phase {
    fn of(kind: FrameKind) -> Self {
        match kind {
            FrameKind::Swap | FrameKind::SwapBack => Phase::Swapping,
            FrameKind::Fill | FrameKind::Cascade { .. } => Phase::Resolving,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swapping => "swapping",
            Phase::Resolving => "resolving",
        }
    }
}

/// Why a swap request was not handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A previous swap is still being presented
    Busy,
    /// The attempt is already won or lost
    GameOver,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Busy => "busy",
            RejectReason::GameOver => "game_over",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::Busy => "board is still animating",
            RejectReason::GameOver => "level is over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Rejected(RejectReason),
    Played(SwapOutcome),
}

impl MoveResult {
    /// True when the engine accepted the swap and charged a move
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveResult::Played(outcome) if outcome.is_accepted())
    }
}

pub struct GameSession {
    config: GameConfig,
    engine: GridEngine,
    progress: ProgressTracker,
    store: Box<dyn ProgressStore>,
    phase: Phase,
    pending: VecDeque<EventFrame>,
    frame_timer_ms: u32,
    ready: Vec<GridEvent>,
    selection: Option<Pos>,
    seeds: TokenRng,
}

impl GameSession {
    /// Start a session with progress read from `store`
    pub fn new(config: GameConfig, store: Box<dyn ProgressStore>) -> Result<Self> {
        config.validate()?;
        let mut seeds = session_seeds(&config);
        let board_rng = TokenRng::new(seeds.next_seed());
        let engine = GridEngine::new(config.width, config.height, config.palette(), board_rng)?;
        Ok(Self::assemble(config, engine, store, seeds))
    }

    /// Start a session with the store named by `config.save_path`
    pub fn from_config(config: GameConfig) -> Result<Self> {
        let store: Box<dyn ProgressStore> = match &config.save_path {
            Some(path) => Box::new(JsonFileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };
        Self::new(config, store)
    }

    /// Start a session on a prepared grid; its size overrides the config
    pub fn with_grid(
        mut config: GameConfig,
        grid: Grid,
        store: Box<dyn ProgressStore>,
    ) -> Result<Self> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        let mut seeds = session_seeds(&config);
        let board_rng = TokenRng::new(seeds.next_seed());
        let engine = GridEngine::with_grid(grid, config.palette(), board_rng)?;
        Ok(Self::assemble(config, engine, store, seeds))
    }

    fn assemble(
        config: GameConfig,
        engine: GridEngine,
        store: Box<dyn ProgressStore>,
        seeds: TokenRng,
    ) -> Self {
        let progress = ProgressTracker::load(store.as_ref(), config.initial_moves);
        info!(
            width = config.width,
            height = config.height,
            kinds = config.token_kinds,
            seed = engine.seed(),
            level = progress.level(),
            "session started"
        );

        let mut session = Self {
            config,
            engine,
            progress,
            store,
            phase: Phase::Idle,
            pending: VecDeque::new(),
            frame_timer_ms: 0,
            ready: Vec::new(),
            selection: None,
            seeds,
        };
        session.queue_engine_frames();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn selection(&self) -> Option<Pos> {
        self.selection
    }

    pub fn status(&self) -> GameStatus {
        self.progress.status()
    }

    /// Swap two cells if the session can take input
    ///
    /// Out-of-bounds positions are an error; every other request yields a
    /// [`MoveResult`].
    pub fn try_swap(&mut self, a: Pos, b: Pos) -> Result<MoveResult> {
        if self.is_busy() {
            debug!(%a, %b, phase = self.phase.as_str(), "swap rejected, busy");
            return Ok(MoveResult::Rejected(RejectReason::Busy));
        }
        if self.progress.is_game_over() {
            debug!(%a, %b, status = self.progress.status().as_str(), "swap rejected, game over");
            return Ok(MoveResult::Rejected(RejectReason::GameOver));
        }

        self.selection = None;
        let outcome = self.engine.swap(a, b, &mut self.progress);
        self.queue_engine_frames();
        let outcome = outcome?;

        if outcome.is_accepted() {
            debug!(
                moves = self.progress.moves_remaining(),
                score = self.progress.score(),
                "move played"
            );
        }
        Ok(MoveResult::Played(outcome))
    }

    /// Press on a cell; returns false when the cell cannot be selected
    pub fn select(&mut self, pos: Pos) -> bool {
        if self.is_busy() || self.progress.is_game_over() || !self.grid().in_bounds(pos) {
            return false;
        }
        self.selection = Some(pos);
        true
    }

    /// Release on a cell, swapping it with the selected one
    ///
    /// Without a selection, or off the board, the gesture just deselects.
    pub fn release(&mut self, pos: Pos) -> Result<Option<MoveResult>> {
        let Some(selected) = self.selection.take() else {
            return Ok(None);
        };
        if !self.grid().in_bounds(pos) {
            debug!(%selected, %pos, "released off the board");
            return Ok(None);
        }
        self.try_swap(selected, pos).map(Some)
    }

    pub fn select_world(&mut self, world_x: f32, world_y: f32) -> bool {
        self.select(Pos::from_world(world_x, world_y, self.config.spacing))
    }

    pub fn release_world(&mut self, world_x: f32, world_y: f32) -> Result<Option<MoveResult>> {
        self.release(Pos::from_world(world_x, world_y, self.config.spacing))
    }

    /// Advance presentation time
    ///
    /// Returns true when at least one frame of events was released.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        self.advance(elapsed_ms)
    }

    fn advance(&mut self, elapsed_ms: u32) -> bool {
        let mut budget = elapsed_ms;
        let mut released = false;

        loop {
            if self.frame_timer_ms > budget {
                self.frame_timer_ms -= budget;
                return released;
            }
            budget -= self.frame_timer_ms;
            self.frame_timer_ms = 0;

            match self.pending.pop_front() {
                Some(frame) => {
                    self.phase = Phase::of(frame.kind);
                    self.frame_timer_ms = self.frame_duration(frame.kind);
                    self.ready.extend(frame.events);
                    released = true;
                }
                None => {
                    self.phase = Phase::Idle;
                    return released;
                }
            }
        }
    }

    fn frame_duration(&self, kind: FrameKind) -> u32 {
        match kind {
            FrameKind::Fill => 0,
            FrameKind::Swap | FrameKind::SwapBack => self.config.swap_ms,
            FrameKind::Cascade { .. } => self.config.settle_ms,
        }
    }

    fn queue_engine_frames(&mut self) {
        self.pending.extend(self.engine.take_frames());
        if !self.pending.is_empty() {
            self.advance(0);
        }
    }

    /// Board events released so far, oldest first
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.ready)
    }

    pub fn take_progress_events(&mut self) -> Vec<ProgressEvent> {
        self.progress.take_events()
    }

    /// A swap that would produce a match, if any
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        find_valid_swap(self.engine.grid())
    }

    /// Move to the next level after a win and deal a new board
    pub fn advance_level(&mut self) -> Result<u32> {
        if self.progress.status() != GameStatus::Won {
            return Err(SessionError::NotWon);
        }
        let level = self.progress.advance_level(self.store.as_mut())?;
        self.deal_new_board();
        Ok(level)
    }

    /// Restart the current level on a new board
    pub fn retry(&mut self) {
        self.progress.retry();
        self.deal_new_board();
    }

    /// Deal new boards until some swap can produce a match
    ///
    /// Returns true when the board was replaced. Gives up with
    /// [`SessionError::Unplayable`] after [`MAX_RESHUFFLES`] dead boards.
    pub fn reshuffle_if_stuck(&mut self) -> Result<bool> {
        if self.is_busy() || self.hint().is_some() {
            return Ok(false);
        }
        for _ in 0..MAX_RESHUFFLES {
            warn!(seed = self.engine.seed(), "no valid swap left, dealing a new board");
            self.deal_new_board();
            if self.hint().is_some() {
                return Ok(true);
            }
        }
        error!(
            width = self.config.width,
            height = self.config.height,
            kinds = self.config.token_kinds,
            "no playable board found"
        );
        Err(SessionError::Unplayable {
            attempts: MAX_RESHUFFLES,
        })
    }

    fn deal_new_board(&mut self) {
        self.pending.clear();
        self.ready.clear();
        self.frame_timer_ms = 0;
        self.phase = Phase::Idle;
        self.selection = None;
        self.engine.regenerate(Some(self.seeds.next_seed()));
        self.queue_engine_frames();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self.engine.grid(), &self.progress, self.phase, self.engine.seed())
    }
}

fn session_seeds(config: &GameConfig) -> TokenRng {
    match config.seed {
        Some(seed) => TokenRng::new(seed),
        None => TokenRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        TokenType::{Blue as B, Green as G, Orange as O, Red as R, Yellow as Y},
        LEVEL_KEY, SCORE_TO_WIN_KEY,
    };

    fn grid(rows: &[[crate::types::TokenType; 3]]) -> Grid {
        let rows: Vec<Vec<_>> = rows.iter().map(|r| r.iter().map(|&t| Some(t)).collect()).collect();
        Grid::from_rows(&rows).unwrap()
    }

    /// Swapping (1,0) with (1,1) completes the bottom two rows
    fn matching_grid() -> Grid {
        grid(&[[R, G, R], [G, R, G], [B, Y, B]])
    }

    /// Swapping (0,0) with (1,0) matches nothing
    fn dead_swap_grid() -> Grid {
        grid(&[[R, G, B], [Y, O, R], [G, B, Y]])
    }

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn session(config: GameConfig, grid: Grid) -> GameSession {
        GameSession::with_grid(config, grid, Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_new_session_is_idle_with_fill_events() {
        let mut session = GameSession::from_config(seeded()).unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.grid().is_full());

        let events = session.take_events();
        assert_eq!(events.len(), 50);
        assert!(events.iter().all(|e| matches!(e, GridEvent::Spawned { .. })));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = GameSession::from_config(seeded()).unwrap();
        let b = GameSession::from_config(seeded()).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_busy_until_swap_back_played() {
        let mut session = session(seeded(), dead_swap_grid());
        let before = session.grid().clone();

        let result = session.try_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(result, MoveResult::Played(SwapOutcome::Reverted));
        assert_eq!(session.grid(), &before);
        assert_eq!(session.phase(), Phase::Swapping);

        let again = session.try_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(again, MoveResult::Rejected(RejectReason::Busy));
        assert_eq!(session.progress().moves_remaining(), 29);

        assert!(session.tick(1000));
        assert_eq!(session.phase(), Phase::Swapping);
        session.tick(1000);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.take_events().len(), 4);
    }

    #[test]
    fn test_tick_paces_cascade_frames() {
        let mut session = session(seeded(), matching_grid());
        session
            .try_swap(Pos::new(1, 0), Pos::new(1, 1))
            .unwrap();

        let swap_events = session.take_events();
        assert_eq!(swap_events.len(), 2);
        assert!(swap_events
            .iter()
            .all(|e| matches!(e, GridEvent::Moved { .. })));

        assert!(!session.tick(999));
        assert!(session.take_events().is_empty());

        assert!(session.tick(1));
        assert_eq!(session.phase(), Phase::Resolving);
        let pass = session.take_events();
        let matched = pass
            .iter()
            .filter(|e| matches!(e, GridEvent::Matched { .. }))
            .count();
        assert_eq!(matched, 2);

        for _ in 0..1000 {
            if !session.is_busy() {
                break;
            }
            session.tick(500);
        }
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.engine().is_stable());
    }

    #[test]
    fn test_instant_config_never_busy() {
        let mut session = session(seeded().instant(), matching_grid());
        let result = session.try_swap(Pos::new(1, 0), Pos::new(1, 1)).unwrap();
        assert!(result.is_accepted());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.progress().score() >= 60);
    }

    #[test]
    fn test_game_over_rejects_swaps() {
        let config = GameConfig {
            initial_moves: 1,
            ..seeded().instant()
        };
        let mut session = session(config, dead_swap_grid());
        session.try_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(session.status(), GameStatus::Lost);
        assert_eq!(
            session.take_progress_events(),
            vec![ProgressEvent::Lost { score: 0, level: 1 }]
        );

        let result = session.try_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(result, MoveResult::Rejected(RejectReason::GameOver));
        assert_eq!(session.progress().moves_remaining(), 0);
    }

    #[test]
    fn test_winning_last_move_can_advance() {
        let mut store = MemoryStore::new();
        store.set_int(SCORE_TO_WIN_KEY, 30);
        let config = GameConfig {
            initial_moves: 1,
            ..seeded().instant()
        };
        let mut session =
            GameSession::with_grid(config, matching_grid(), Box::new(store)).unwrap();

        session.try_swap(Pos::new(1, 0), Pos::new(1, 1)).unwrap();
        assert_eq!(session.progress().moves_remaining(), 0);
        assert_eq!(session.status(), GameStatus::Won);
        assert!(session
            .take_progress_events()
            .contains(&ProgressEvent::Won { score: 30, level: 1 }));
        assert_eq!(session.advance_level().unwrap(), 2);
    }

    #[test]
    fn test_reshuffle_keeps_playable_board() {
        let mut session = session(seeded().instant(), matching_grid());
        let before = session.grid().clone();
        assert!(!session.reshuffle_if_stuck().unwrap());
        assert_eq!(session.grid(), &before);
    }

    #[test]
    fn test_reshuffle_gives_up_on_boards_too_small_to_match() {
        let tiny = Grid::from_rows(&[vec![Some(R), Some(G)], vec![Some(B), Some(Y)]]).unwrap();
        let mut session = session(seeded().instant(), tiny);
        assert!(session.hint().is_none());
        assert!(matches!(
            session.reshuffle_if_stuck(),
            Err(SessionError::Unplayable { attempts: MAX_RESHUFFLES })
        ));
    }

    #[test]
    fn test_small_palette_is_rejected() {
        let config = GameConfig {
            token_kinds: 1,
            ..seeded()
        };
        assert!(matches!(
            GameSession::from_config(config),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_advance_level_requires_win() {
        let mut session = session(seeded().instant(), dead_swap_grid());
        assert!(matches!(session.advance_level(), Err(SessionError::NotWon)));
        assert_eq!(session.progress().level(), 1);
    }

    #[test]
    fn test_win_then_advance_persists_progress() {
        let mut store = MemoryStore::new();
        store.set_int(SCORE_TO_WIN_KEY, 30);
        let mut session =
            GameSession::with_grid(seeded().instant(), matching_grid(), Box::new(store)).unwrap();

        session.try_swap(Pos::new(1, 0), Pos::new(1, 1)).unwrap();
        assert_eq!(session.status(), GameStatus::Won);

        let before = session.grid().clone();
        assert_eq!(session.advance_level().unwrap(), 2);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.progress().score(), 0);
        assert_eq!(session.progress().score_to_win(), 60);
        assert_eq!(session.store().get_int(LEVEL_KEY), Some(2));
        assert_eq!(session.store().get_int(SCORE_TO_WIN_KEY), Some(60));
        assert!(session.grid().is_full());
        assert_ne!(session.grid(), &before);
    }

    #[test]
    fn test_retry_restores_budget() {
        let config = GameConfig {
            initial_moves: 1,
            ..seeded().instant()
        };
        let mut session = session(config, dead_swap_grid());
        session.try_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert!(session.progress().is_game_over());

        session.retry();
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.progress().moves_remaining(), 1);
        assert_eq!(session.progress().level(), 1);
        assert!(session.engine().is_stable());
    }

    #[test]
    fn test_select_release_gesture() {
        let mut session = session(seeded().instant(), matching_grid());

        assert_eq!(session.release(Pos::new(1, 1)).unwrap(), None);
        assert!(!session.select(Pos::new(5, 5)));

        assert!(session.select(Pos::new(1, 0)));
        assert_eq!(session.selection(), Some(Pos::new(1, 0)));
        let result = session.release(Pos::new(1, 1)).unwrap();
        assert!(matches!(result, Some(MoveResult::Played(SwapOutcome::Committed(_)))));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_release_on_far_cell_is_invalid() {
        let mut session = session(seeded().instant(), dead_swap_grid());
        assert!(session.select(Pos::new(0, 0)));
        let result = session.release(Pos::new(2, 2)).unwrap();
        assert_eq!(result, Some(MoveResult::Played(SwapOutcome::Invalid)));
        assert_eq!(session.progress().moves_remaining(), 30);
    }

    #[test]
    fn test_world_coordinates_map_to_cells() {
        let mut session = session(seeded().instant(), matching_grid());
        assert!(session.select_world(0.72, 0.1));
        assert_eq!(session.selection(), Some(Pos::new(1, 0)));
        let result = session.release_world(0.68, 0.69).unwrap();
        assert!(result.is_some_and(|r| r.is_accepted()));
    }

    #[test]
    fn test_out_of_bounds_swap_is_error() {
        let mut session = session(seeded().instant(), dead_swap_grid());
        assert!(matches!(
            session.try_swap(Pos::new(2, 0), Pos::new(3, 0)),
            Err(SessionError::Engine(_))
        ));
        assert_eq!(session.progress().moves_remaining(), 30);
    }

    #[test]
    fn test_hint_on_matching_grid() {
        let session = session(seeded().instant(), matching_grid());
        let (a, b) = session.hint().unwrap();
        assert!(a.is_adjacent(b));
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let session = session(seeded().instant(), dead_swap_grid());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.width, 3);
        assert_eq!(snapshot.rows[0], vec![1, 4, 5]);
        assert_eq!(snapshot.moves_remaining, 30);
        assert_eq!(snapshot.status, "playing");
        assert!(snapshot.playable());
    }
}
