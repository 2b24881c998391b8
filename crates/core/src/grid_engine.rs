//! Grid engine - swap validation, rollback and cascade resolution
//!
//! The engine owns the grid, the token palette and the random source. It is a
//! synchronous state machine: [`GridEngine::swap`] and
//! [`GridEngine::resolve_cascade`] return only once the grid is stable again.
//! Every mutation is recorded as a [`GridEvent`] inside an [`EventFrame`] so a
//! presentation layer can replay the stages at its own pace.
//!
//! Move and score notifications go out through [`ProgressListener`]; the
//! engine never looks at the resulting game state. Stopping swaps after a win
//! or loss is the caller's job.

use arrayvec::ArrayVec;
use tracing::{debug, error, warn};

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::matcher::{find_matches, MatchGroup};
use crate::rng::TokenRng;
use crate::scoring::calculate_match_score;
use crate::types::{
    EventFrame, FrameKind, GridEvent, Pos, TokenType, MATCH_REWARD, MAX_CASCADE_PASSES,
};

/// Candidate list for one spawn; never larger than the token set
pub type Candidates = ArrayVec<TokenType, { TokenType::COUNT }>;

/// Receiver of the engine's progress notifications
pub trait ProgressListener {
    /// One move was consumed (charged for every adjacent swap, matched or not)
    fn use_move(&mut self);

    /// One match group was scored
    fn add_score(&mut self, points: u32);
}

/// Logical result of a swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The cells are not adjacent; nothing changed and no move was charged
    Invalid,
    /// The swap produced no match and was rolled back (the move was charged)
    Reverted,
    /// The swap produced at least one match and the cascade ran to a stable grid
    Committed(CascadeReport),
}

impl SwapOutcome {
    /// True when a move was charged
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SwapOutcome::Invalid)
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, SwapOutcome::Committed(_))
    }
}

/// One clear-and-refill iteration of the cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePass {
    /// Groups scored in this pass, in scan order
    pub groups: Vec<MatchGroup>,
    /// Cells emptied by this pass, sorted and deduplicated
    pub cleared: Vec<Pos>,
    /// Fresh tokens placed by the refill, in fill order
    pub spawned: Vec<(Pos, TokenType)>,
}

/// Summary of a complete cascade
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub passes: Vec<CascadePass>,
    pub points: u32,
}

impl CascadeReport {
    /// Total number of scored groups across all passes
    pub fn groups_scored(&self) -> usize {
        self.passes.iter().map(|pass| pass.groups.len()).sum()
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// True when the grid was already stable
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Token shared by two settled neighbours, if they hold the same one
fn pair_token(grid: &Grid, a: Pos, b: Pos) -> Option<TokenType> {
    let token = grid.token(a)?;
    (grid.token(b) == Some(token)).then_some(token)
}

/// Candidates for `pos` plus whether the unrestricted fallback was used
fn spawn_candidates(grid: &Grid, pos: Pos, palette: &[TokenType]) -> (Candidates, bool) {
    let left = pair_token(grid, pos.offset(-1, 0), pos.offset(-2, 0));
    let below = pair_token(grid, pos.offset(0, -1), pos.offset(0, -2));

    let allowed: Candidates = palette
        .iter()
        .copied()
        .filter(|&token| Some(token) != left && Some(token) != below)
        .take(TokenType::COUNT)
        .collect();

    if allowed.is_empty() {
        (palette.iter().copied().take(TokenType::COUNT).collect(), true)
    } else {
        (allowed, false)
    }
}

/// Tokens that may be placed at `pos` without completing a run of three
///
/// A token is excluded when the two cells to the left both hold it, or the
/// two cells below both hold it. Empty neighbours exclude nothing. When every
/// token is excluded the whole palette is returned.
pub fn candidates_at(grid: &Grid, pos: Pos, palette: &[TokenType]) -> Candidates {
    spawn_candidates(grid, pos, palette).0
}

/// Validate a palette: non-empty and free of duplicates
pub fn validate_palette(palette: &[TokenType]) -> Result<()> {
    if palette.is_empty() {
        return Err(EngineError::EmptyPalette);
    }
    for (i, token) in palette.iter().enumerate() {
        if palette[..i].contains(token) {
            return Err(EngineError::DuplicateToken(*token));
        }
    }
    Ok(())
}

/// The grid simulation engine
#[derive(Debug, Clone)]
pub struct GridEngine {
    grid: Grid,
    palette: Candidates,
    rng: TokenRng,
    frames: Vec<EventFrame>,
    max_passes: u32,
}

impl GridEngine {
    /// Create an engine with a freshly generated board
    pub fn new(width: usize, height: usize, palette: &[TokenType], rng: TokenRng) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let mut engine = Self::with_grid(grid, palette, rng)?;
        engine.fill_board();
        Ok(engine)
    }

    /// Wrap an existing grid without filling it
    ///
    /// Empty cells stay empty until the next refill or [`GridEngine::regenerate`].
    pub fn with_grid(grid: Grid, palette: &[TokenType], rng: TokenRng) -> Result<Self> {
        validate_palette(palette)?;
        Ok(Self {
            grid,
            palette: palette.iter().copied().collect(),
            rng,
            frames: Vec::new(),
            max_passes: MAX_CASCADE_PASSES,
        })
    }

    /// Override the cascade safety bound
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &[TokenType] {
        &self.palette
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Check that no match group exists
    pub fn is_stable(&self) -> bool {
        !crate::matcher::has_match(&self.grid)
    }

    /// Throw the board away and generate a new one
    ///
    /// With `Some(seed)` the random source is reseeded first.
    pub fn regenerate(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = TokenRng::new(seed);
        }
        self.grid.clear();
        self.fill_board();
    }

    fn fill_board(&mut self) {
        self.begin_frame(FrameKind::Fill);
        let spawned = self.refill();
        debug!(
            width = self.grid.width(),
            height = self.grid.height(),
            cells = spawned.len(),
            "board filled"
        );
    }

    /// Fill every empty cell, columns left to right, each bottom to top
    fn refill(&mut self) -> Vec<(Pos, TokenType)> {
        let mut spawned = Vec::with_capacity(self.grid.empty_count());
        let mut fallbacks = 0usize;
        let positions: Vec<Pos> = self.grid.positions().collect();

        for pos in positions {
            if self.grid.token(pos).is_some() {
                continue;
            }
            let (candidates, fallback) = spawn_candidates(&self.grid, pos, &self.palette);
            if fallback {
                fallbacks += 1;
            }
            let Some(token) = self.rng.pick(&candidates) else {
                continue;
            };
            self.grid.set(pos, Some(token));
            self.emit(GridEvent::Spawned { pos, token });
            spawned.push((pos, token));
        }

        if fallbacks > 0 {
            warn!(
                fallbacks,
                palette = self.palette.len(),
                "every token excluded, spawned from the full palette"
            );
        }
        spawned
    }

    /// Try to swap two cells
    ///
    /// Out-of-bounds positions are rejected before anything happens. A
    /// non-adjacent pair is [`SwapOutcome::Invalid`]. Any adjacent pair is
    /// charged a move, then either rolled back or committed and cascaded.
    pub fn swap(
        &mut self,
        a: Pos,
        b: Pos,
        listener: &mut impl ProgressListener,
    ) -> Result<SwapOutcome> {
        self.grid.check_bounds(a)?;
        self.grid.check_bounds(b)?;

        if !a.is_adjacent(b) {
            debug!(%a, %b, "swap rejected, cells not adjacent");
            return Ok(SwapOutcome::Invalid);
        }

        listener.use_move();

        self.begin_frame(FrameKind::Swap);
        self.exchange(a, b);

        if !crate::matcher::has_match(&self.grid) {
            self.begin_frame(FrameKind::SwapBack);
            self.exchange(a, b);
            debug!(%a, %b, "swap reverted, no match");
            return Ok(SwapOutcome::Reverted);
        }

        let report = self.resolve_cascade(listener)?;
        debug!(
            %a,
            %b,
            passes = report.pass_count(),
            groups = report.groups_scored(),
            points = report.points,
            "swap committed"
        );
        Ok(SwapOutcome::Committed(report))
    }

    fn exchange(&mut self, a: Pos, b: Pos) {
        self.grid.swap(a, b);
        self.emit(GridEvent::Moved { from: a, to: b });
        self.emit(GridEvent::Moved { from: b, to: a });
    }

    /// Clear, refill and re-check until no match group remains
    ///
    /// Each detected group reports [`MATCH_REWARD`] to the listener. On a
    /// stable grid this does nothing and returns an empty report.
    pub fn resolve_cascade(&mut self, listener: &mut impl ProgressListener) -> Result<CascadeReport> {
        let mut report = CascadeReport::default();

        loop {
            let scan = find_matches(&self.grid);
            if scan.is_empty() {
                return Ok(report);
            }

            let pass = report.passes.len() as u32;
            if pass >= self.max_passes {
                error!(passes = pass, "cascade did not stabilize");
                return Err(EngineError::CascadeLimitExceeded { passes: pass });
            }

            self.begin_frame(FrameKind::Cascade { pass });

            for group in &scan.groups {
                listener.add_score(MATCH_REWARD);
                self.emit(GridEvent::Matched {
                    axis: group.axis,
                    token: group.token,
                    cells: group.cells,
                    points: MATCH_REWARD,
                });
            }

            for &pos in &scan.clear_set {
                self.grid.set(pos, None);
                self.emit(GridEvent::Cleared { pos });
            }

            let spawned = self.refill();
            debug!(
                pass,
                groups = scan.groups.len(),
                cleared = scan.clear_set.len(),
                "cascade pass"
            );

            report.points = report
                .points
                .saturating_add(calculate_match_score(scan.groups.len()));
            report.passes.push(CascadePass {
                groups: scan.groups,
                cleared: scan.clear_set,
                spawned,
            });
        }
    }

    fn begin_frame(&mut self, kind: FrameKind) {
        self.frames.push(EventFrame::new(kind));
    }

    fn emit(&mut self, event: GridEvent) {
        match self.frames.last_mut() {
            Some(frame) => frame.events.push(event),
            None => self.frames.push(EventFrame {
                kind: FrameKind::Fill,
                events: vec![event],
            }),
        }
    }

    /// Take the recorded frames, oldest first
    pub fn take_frames(&mut self) -> Vec<EventFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Take the recorded events as one flat sequence
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        self.take_frames()
            .into_iter()
            .flat_map(|frame| frame.events)
            .collect()
    }
}
