//! Headless autoplay runner (default binary).
//!
//! Plays the hinted swap until the level is won or the moves run out, then
//! prints a summary, or the final session snapshot with `--json`.

mod cli;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use candy_match::core::scoring::groups_needed;
use candy_match::engine::{GameConfig, GameSession, MoveResult};
use candy_match::types::{GameStatus, GridEvent};

/// Simulated frame time while waiting for the presentation queue
const TICK_MS: u32 = 16;

#[derive(Debug, Default)]
struct RunStats {
    swaps: u32,
    reverted: u32,
    groups: u32,
    reshuffles: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("candy_match=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = cli::parse_args(&args)?;

    let mut config = GameConfig::from_env();
    options.apply(&mut config);
    config.validate()?;

    let mut session = GameSession::from_config(config)?;
    let mut stats = RunStats::default();

    for attempt in 1..=options.levels.max(1) {
        play_level(&mut session, &mut stats)?;

        let status = session.status();
        if !options.json {
            print_board(&session);
            println!(
                "level {}: {} with score {}/{} and {} moves left",
                session.progress().level(),
                status.as_str(),
                session.progress().score(),
                session.progress().score_to_win(),
                session.progress().moves_remaining(),
            );
            if status == GameStatus::Lost {
                println!(
                    "{} more match groups were needed",
                    groups_needed(session.progress().score(), session.progress().score_to_win())
                );
            }
        }

        if status != GameStatus::Won || attempt == options.levels.max(1) {
            break;
        }
        session.advance_level()?;
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        println!(
            "swaps: {}, reverted: {}, groups: {}, reshuffles: {}",
            stats.swaps, stats.reverted, stats.groups, stats.reshuffles
        );
    }
    Ok(())
}

fn play_level(session: &mut GameSession, stats: &mut RunStats) -> Result<()> {
    session.take_events();

    while !session.progress().is_game_over() {
        if session.reshuffle_if_stuck()? {
            stats.reshuffles += 1;
            session.take_events();
            continue;
        }
        let Some((a, b)) = session.hint() else {
            break;
        };

        match session.try_swap(a, b)? {
            MoveResult::Played(outcome) if outcome.is_accepted() => {
                stats.swaps += 1;
                if !outcome.is_committed() {
                    stats.reverted += 1;
                }
            }
            MoveResult::Played(_) | MoveResult::Rejected(_) => break,
        }

        while session.is_busy() {
            session.tick(TICK_MS);
        }
        stats.groups += session
            .take_events()
            .iter()
            .filter(|e| matches!(e, GridEvent::Matched { .. }))
            .count() as u32;
    }

    for event in session.take_progress_events() {
        info!(?event, "progress");
    }
    Ok(())
}

fn print_board(session: &GameSession) {
    for row in session.grid().rows().iter().rev() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| cell.map_or(0, |t| t.code()).to_string())
            .collect();
        println!("{}", line.join(" "));
    }
}
