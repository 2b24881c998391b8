//! Command line options for the autoplay runner.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use candy_match::engine::GameConfig;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub seed: Option<u64>,
    pub moves: Option<u32>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub kinds: Option<usize>,
    pub save: Option<PathBuf>,
    pub levels: u32,
    pub json: bool,
}

impl CliOptions {
    /// Flags win over environment values
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(moves) = self.moves {
            config.initial_moves = moves;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(kinds) = self.kinds {
            config.token_kinds = kinds;
        }
        if let Some(save) = &self.save {
            config.save_path = Some(save.clone());
        }
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let v = value(args, i, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

pub fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions {
        levels: 1,
        ..CliOptions::default()
    };

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" => {
                i += 1;
                options.seed = Some(number(args, i, flag)?);
            }
            "--moves" => {
                i += 1;
                options.moves = Some(number(args, i, flag)?);
            }
            "--width" => {
                i += 1;
                options.width = Some(number(args, i, flag)?);
            }
            "--height" => {
                i += 1;
                options.height = Some(number(args, i, flag)?);
            }
            "--kinds" => {
                i += 1;
                options.kinds = Some(number(args, i, flag)?);
            }
            "--levels" => {
                i += 1;
                options.levels = number(args, i, flag)?;
            }
            "--save" => {
                i += 1;
                options.save = Some(PathBuf::from(value(args, i, flag)?));
            }
            "--json" => {
                options.json = true;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(options)
}
