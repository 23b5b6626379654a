//! Command line options and the loading of the game configuration.

use clap::Parser;
use mnk_core::constants::{GAME_PRESETS, find_preset};
use mnk_core::{ConfigError, GameConfig};
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Terminal m,n,k-game: k in a row on an m x n board.
#[derive(Parser, Debug)]
#[command(name = "mnk-game")]
#[command(version)]
pub struct Cli {
    /// Preset to start with (Classic Tic-Tac-Toe, Gomoku, Connect Four, Three Players).
    /// Prefixes work.
    #[arg(long, conflicts_with = "config")]
    pub preset: Option<String>,

    /// JSON file holding a game configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of players, overrides the preset or file.
    #[arg(long)]
    pub players: Option<usize>,

    /// Forbids relocating opponent pieces.
    #[arg(long)]
    pub no_relocation: bool,

    /// Plays every seat through its own online session against an in-process store.
    #[arg(long)]
    pub online: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown preset {name:?}, available: {available}")]
    UnknownPreset { name: String, available: String },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Resolves the configuration from file, preset or the Gomoku default, applies the overrides
/// and validates the result.
pub async fn load_config(cli: &Cli) -> Result<GameConfig, LoadError> {
    let mut config = if let Some(path) = &cli.config {
        let json_content = fs::read_to_string(path).await?;
        serde_json::from_str::<GameConfig>(&json_content)?
    } else if let Some(name) = &cli.preset {
        find_preset(name)
            .ok_or_else(|| LoadError::UnknownPreset {
                name: name.clone(),
                available: GAME_PRESETS
                    .iter()
                    .map(|preset| preset.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?
            .to_config(true)
    } else {
        GameConfig::default()
    };

    if let Some(players) = cli.players {
        config.player_count = players;
        config.player_configs = None;
    }
    if cli.no_relocation {
        config.allow_moving_opponent_pieces = false;
    }
    config.validate()?;
    Ok(config)
}
