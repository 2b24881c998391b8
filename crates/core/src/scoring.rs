//! Scoring module - per-group rewards and level goals
//!
//! Compatibility note:
//! Points are awarded per detected 3-window, not per cleared cell. A run of
//! four identical tokens is two overlapping windows and scores twice; a token
//! sitting on both a horizontal and a vertical run counts toward both.

use crate::types::{MATCH_LENGTH, MATCH_REWARD, SCORE_TO_WIN_STEP};

/// Number of scored groups a straight run of `run_len` identical tokens yields
pub fn groups_in_run(run_len: usize) -> usize {
    run_len.saturating_sub(MATCH_LENGTH - 1)
}

/// Points for a batch of detected groups
pub fn calculate_match_score(groups: usize) -> u32 {
    MATCH_REWARD.saturating_mul(groups as u32)
}

/// Goal of the level after one with `score_to_win`
pub fn next_score_to_win(score_to_win: u32) -> u32 {
    score_to_win.saturating_add(SCORE_TO_WIN_STEP)
}

/// Minimum number of groups needed to reach `score_to_win` from `score`
pub fn groups_needed(score: u32, score_to_win: u32) -> u32 {
    score_to_win.saturating_sub(score).div_ceil(MATCH_REWARD)
}
