//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (grid simulation, progress tracking, presentation).
//!
//! # Grid Geometry
//!
//! - **Width**: 5 columns by default (indexed 0-4, left to right)
//! - **Height**: 10 rows by default (indexed 0-9, bottom to top)
//! - `y = 0` is the bottom row, so "below" `(x, y)` means `(x, y - 1)`
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_LENGTH` | 3 | Window length of a match group |
//! | `MATCH_REWARD` | 30 | Points per detected match group |
//! | `INITIAL_MOVES` | 30 | Move budget per attempt |
//! | `DEFAULT_SCORE_TO_WIN` | 300 | Goal for level 1 |
//! | `SCORE_TO_WIN_STEP` | 30 | Goal increase per level |
//! | `MAX_CASCADE_PASSES` | 1000 | Safety bound on the cascade loop |
//! | `MIN_PALETTE_SIZE` | 3 | Fewest candy kinds a session accepts |
//! | `SWAP_ANIMATION_MS` | 1000 | Presentation time of one swap |
//! | `CASCADE_SETTLE_MS` | 500 | Presentation time of one cascade pass |
//!
//! # Examples
//!
//! ```
//! use candy_match_types::{Pos, TokenType};
//!
//! let token = TokenType::from_str("blue").unwrap();
//! assert_eq!(token, TokenType::Blue);
//!
//! assert!(Pos::new(1, 1).is_adjacent(Pos::new(1, 2)));
//! assert!(!Pos::new(1, 1).is_adjacent(Pos::new(2, 2)));
//! ```

/// Default grid width in cells (5 columns)
pub const DEFAULT_GRID_WIDTH: usize = 5;

/// Default grid height in cells (10 rows)
pub const DEFAULT_GRID_HEIGHT: usize = 10;

/// Number of identical cells in a line that form a match group
pub const MATCH_LENGTH: usize = 3;

/// Points awarded per detected match group, regardless of run length
pub const MATCH_REWARD: u32 = 30;

/// Move budget at the start of every attempt
pub const INITIAL_MOVES: u32 = 30;

/// Level used when nothing has been persisted yet
pub const DEFAULT_LEVEL: u32 = 1;

/// Goal used when nothing has been persisted yet
pub const DEFAULT_SCORE_TO_WIN: u32 = 300;

/// Goal increase applied on every level advance
pub const SCORE_TO_WIN_STEP: u32 = 30;

/// Cascade passes allowed before the engine reports a logic defect
pub const MAX_CASCADE_PASSES: u32 = 1000;

/// Presentation time of one swap (and of one swap-back)
pub const SWAP_ANIMATION_MS: u32 = 1000;

/// Presentation time of one cascade pass
pub const CASCADE_SETTLE_MS: u32 = 500;

/// Distance between neighbouring cells in world units
pub const DEFAULT_CELL_SPACING: f32 = 0.7;

/// Number of tokens in the default palette
pub const DEFAULT_PALETTE_SIZE: usize = 5;

/// Smallest palette a playable session accepts
pub const MIN_PALETTE_SIZE: usize = 3;

/// Persistence key for the current level
pub const LEVEL_KEY: &str = "currentLevel";

/// Persistence key for the current goal
pub const SCORE_TO_WIN_KEY: &str = "scoreToWin";

/// The candy kinds a cell can hold
///
/// Tokens are compared by value; there is no per-token identity. A game uses a
/// palette (a subset of these kinds), see [`TokenType::palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl TokenType {
    /// Every token kind, in code order
    pub const ALL: [TokenType; 7] = [
        TokenType::Red,
        TokenType::Orange,
        TokenType::Yellow,
        TokenType::Green,
        TokenType::Blue,
        TokenType::Purple,
        TokenType::Pink,
    ];

    /// Number of distinct token kinds
    pub const COUNT: usize = 7;

    /// The first `size` kinds (clamped to [`TokenType::COUNT`])
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_match_types::TokenType;
    ///
    /// assert_eq!(TokenType::palette(3), &[TokenType::Red, TokenType::Orange, TokenType::Yellow]);
    /// assert_eq!(TokenType::palette(99).len(), 7);
    /// ```
    pub fn palette(size: usize) -> &'static [TokenType] {
        &Self::ALL[..size.min(Self::COUNT)]
    }

    /// Parse token kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_match_types::TokenType;
    ///
    /// assert_eq!(TokenType::from_str("red"), Some(TokenType::Red));
    /// assert_eq!(TokenType::from_str("PINK"), Some(TokenType::Pink));
    /// assert_eq!(TokenType::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(TokenType::Red),
            "orange" => Some(TokenType::Orange),
            "yellow" => Some(TokenType::Yellow),
            "green" => Some(TokenType::Green),
            "blue" => Some(TokenType::Blue),
            "purple" => Some(TokenType::Purple),
            "pink" => Some(TokenType::Pink),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Red => "red",
            TokenType::Orange => "orange",
            TokenType::Yellow => "yellow",
            TokenType::Green => "green",
            TokenType::Blue => "blue",
            TokenType::Purple => "purple",
            TokenType::Pink => "pink",
        }
    }

    /// Stable 1-based code (0 is reserved for an empty cell in snapshots)
    pub fn code(&self) -> u8 {
        match self {
            TokenType::Red => 1,
            TokenType::Orange => 2,
            TokenType::Yellow => 3,
            TokenType::Green => 4,
            TokenType::Blue => 5,
            TokenType::Purple => 6,
            TokenType::Pink => 7,
        }
    }

    /// Inverse of [`TokenType::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }
}

/// A grid coordinate
///
/// Coordinates are signed so that world-space lookups and neighbour offsets
/// can go out of bounds without wrapping; the grid rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Manhattan distance to `other`
    pub fn distance(self, other: Pos) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    /// True iff the two positions share a row or column and are one cell apart
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_match_types::Pos;
    ///
    /// let p = Pos::new(2, 3);
    /// assert!(p.is_adjacent(Pos::new(3, 3)));
    /// assert!(p.is_adjacent(Pos::new(2, 2)));
    /// assert!(!p.is_adjacent(p));
    /// assert!(!p.is_adjacent(Pos::new(4, 3)));
    /// assert!(!p.is_adjacent(Pos::new(3, 4)));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }

    /// Map a world-space position to the grid coordinate under it
    ///
    /// Each axis is `round(world / spacing)`, so positions halfway between two
    /// cells round away from zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_match_types::Pos;
    ///
    /// assert_eq!(Pos::from_world(1.4, 0.0, 0.7), Pos::new(2, 0));
    /// assert_eq!(Pos::from_world(0.3, 0.4, 0.7), Pos::new(0, 1));
    /// ```
    pub fn from_world(world_x: f32, world_y: f32, spacing: f32) -> Self {
        Self {
            x: (world_x / spacing).round() as i32,
            y: (world_y / spacing).round() as i32,
        }
    }

    /// World-space position of this cell's centre
    pub fn to_world(self, spacing: f32) -> (f32, f32) {
        (self.x as f32 * spacing, self.y as f32 * spacing)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell on the grid
///
/// - `None`: empty (only between a clear and the following refill)
/// - `Some(TokenType)`: cell holds a candy of that kind
pub type Cell = Option<TokenType>;

/// Line direction of a match group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchAxis {
    Horizontal,
    Vertical,
}

impl MatchAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchAxis::Horizontal => "horizontal",
            MatchAxis::Vertical => "vertical",
        }
    }
}

/// Board mutations reported to presentation and audio collaborators
///
/// Events are emitted in the order the mutations happen; collaborators may
/// animate them at their own pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// A fresh candy appeared at `pos`
    Spawned { pos: Pos, token: TokenType },
    /// The candy at `from` now sits at `to` (swap and swap-back)
    Moved { from: Pos, to: Pos },
    /// The candy at `pos` was removed
    Cleared { pos: Pos },
    /// One match group was scored (one per detected 3-window)
    Matched {
        axis: MatchAxis,
        token: TokenType,
        cells: [Pos; MATCH_LENGTH],
        points: u32,
    },
}

/// What a batch of [`GridEvent`]s represents, so presentation can pace it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Initial board or a regenerated board
    Fill,
    /// The two candies trade places
    Swap,
    /// A swap without a match trades back
    SwapBack,
    /// One clear-and-refill pass of the cascade (0-based)
    Cascade { pass: u32 },
}

/// Events of one engine stage, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    pub kind: FrameKind,
    pub events: Vec<GridEvent>,
}

impl EventFrame {
    pub fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            events: Vec::new(),
        }
    }
}

/// Outcome state of the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_balance_values() {
        assert_eq!(MATCH_REWARD, 30);
        assert_eq!(INITIAL_MOVES, 30);
        assert_eq!(DEFAULT_SCORE_TO_WIN, 300);
        assert_eq!(SCORE_TO_WIN_STEP, 30);
        assert_eq!(DEFAULT_LEVEL, 1);
        assert_eq!(DEFAULT_GRID_WIDTH, 5);
        assert_eq!(DEFAULT_GRID_HEIGHT, 10);
    }

    #[test]
    fn token_codes_roundtrip_and_skip_zero() {
        assert_eq!(TokenType::from_code(0), None);
        assert_eq!(TokenType::from_code(8), None);
        for token in TokenType::ALL {
            assert_ne!(token.code(), 0);
            assert_eq!(TokenType::from_code(token.code()), Some(token));
            assert_eq!(TokenType::from_str(token.as_str()), Some(token));
        }
    }

    #[test]
    fn diagonal_and_distant_positions_are_not_adjacent() {
        let p = Pos::new(0, 0);
        assert!(!p.is_adjacent(Pos::new(1, 1)));
        assert!(!p.is_adjacent(Pos::new(0, 2)));
        assert!(!p.is_adjacent(Pos::new(-1, 1)));
        assert!(p.is_adjacent(Pos::new(-1, 0)));
    }

    #[test]
    fn extreme_positions_do_not_overflow() {
        let low = Pos::new(i32::MIN, i32::MIN);
        let high = Pos::new(i32::MAX, i32::MAX);
        assert!(!low.is_adjacent(high));
        assert_eq!(low.distance(high), 2 * u64::from(u32::MAX));
        assert!(Pos::new(i32::MAX, 0).is_adjacent(Pos::new(i32::MAX - 1, 0)));
        assert_eq!(high.offset(1, 1), high);
    }

    #[test]
    fn world_mapping_matches_cell_centres() {
        for x in 0..5 {
            for y in 0..10 {
                let pos = Pos::new(x, y);
                let (wx, wy) = pos.to_world(DEFAULT_CELL_SPACING);
                assert_eq!(Pos::from_world(wx, wy, DEFAULT_CELL_SPACING), pos);
            }
        }
    }

    #[test]
    fn status_is_over() {
        assert!(!GameStatus::Playing.is_over());
        assert!(GameStatus::Won.is_over());
        assert!(GameStatus::Lost.is_over());
    }
}
