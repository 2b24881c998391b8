//! Match detection - fixed-length window scan
//!
//! Every horizontal window `(x, x+1, x+2)` and every vertical window
//! `(y, y+1, y+2)` is tested. A window whose three cells hold the same token is
//! one [`MatchGroup`]. Overlapping windows are kept as separate groups (they
//! are scored separately) while their cells are merged into one deduplicated
//! clear-set, so a run of length L yields L-2 groups along its axis and is
//! still cleared completely.

use crate::grid::Grid;
use crate::types::{MatchAxis, Pos, TokenType, MATCH_LENGTH};

/// One detected 3-window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchGroup {
    pub axis: MatchAxis,
    pub token: TokenType,
    pub cells: [Pos; MATCH_LENGTH],
}

/// Result of scanning a whole grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScan {
    /// Groups in scan order: rows bottom to top, then columns left to right
    pub groups: Vec<MatchGroup>,
    /// Union of all group cells, sorted and deduplicated
    pub clear_set: Vec<Pos>,
}

impl MatchScan {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Token shared by the whole window, if every cell holds the same one
fn window_token(grid: &Grid, cells: &[Pos; MATCH_LENGTH]) -> Option<TokenType> {
    let first = grid.token(cells[0])?;
    cells[1..]
        .iter()
        .all(|&pos| grid.token(pos) == Some(first))
        .then_some(first)
}

/// Visit every window of the grid in scan order
fn for_each_window(grid: &Grid, mut visit: impl FnMut(MatchAxis, [Pos; MATCH_LENGTH]) -> bool) {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let span = MATCH_LENGTH as i32;

    for y in 0..height {
        for x in 0..=(width - span) {
            let cells = [Pos::new(x, y), Pos::new(x + 1, y), Pos::new(x + 2, y)];
            if !visit(MatchAxis::Horizontal, cells) {
                return;
            }
        }
    }

    for x in 0..width {
        for y in 0..=(height - span) {
            let cells = [Pos::new(x, y), Pos::new(x, y + 1), Pos::new(x, y + 2)];
            if !visit(MatchAxis::Vertical, cells) {
                return;
            }
        }
    }
}

/// Detect every match group on the grid
pub fn find_matches(grid: &Grid) -> MatchScan {
    let mut scan = MatchScan::default();

    for_each_window(grid, |axis, cells| {
        if let Some(token) = window_token(grid, &cells) {
            scan.groups.push(MatchGroup { axis, token, cells });
            scan.clear_set.extend_from_slice(&cells);
        }
        true
    });

    scan.clear_set.sort_unstable();
    scan.clear_set.dedup();
    scan
}

/// Check whether any match group exists (stops at the first one)
pub fn has_match(grid: &Grid) -> bool {
    let mut found = false;
    for_each_window(grid, |_, cells| {
        found = window_token(grid, &cells).is_some();
        !found
    });
    found
}

/// Find the first adjacent swap that would produce a match
///
/// Pairs are tried in fill order, each cell with its right and upper
/// neighbour. The caller's grid is not modified.
pub fn find_valid_swap(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut probe = grid.clone();
    let positions: Vec<Pos> = grid.positions().collect();

    for pos in positions {
        for other in [pos.offset(1, 0), pos.offset(0, 1)] {
            if !grid.in_bounds(other) || grid.token(pos) == grid.token(other) {
                continue;
            }
            probe.swap(pos, other);
            let matched = has_match(&probe);
            probe.swap(pos, other);
            if matched {
                return Some((pos, other));
            }
        }
    }

    None
}
