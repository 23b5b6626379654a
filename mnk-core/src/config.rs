//! Game and player configuration together with the validation that runs before a game gets started.

use crate::board::BoardSize;
use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_WIN_LENGTH, MAX_PLAYERS, MIN_BOARD_DIMENSION, MIN_PLAYERS,
    MIN_WIN_LENGTH, default_player_configs,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The presentation settings of a single player. The index in the player list is the turn order
/// and the value written to the board.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub symbol: String,
    pub color: String,
}

/// A partial update of a [`PlayerConfig`]. Fields that are [`None`] stay untouched.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PlayerConfig {
    /// Merges the set fields of the patch into a copy of this configuration.
    pub fn merged(&self, patch: &PlayerConfigPatch) -> PlayerConfig {
        PlayerConfig {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            symbol: patch.symbol.clone().unwrap_or_else(|| self.symbol.clone()),
            color: patch.color.clone().unwrap_or_else(|| self.color.clone()),
        }
    }
}

/// Everything needed to start a game.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub win_length: usize,
    #[serde(default = "default_allow_moving")]
    pub allow_moving_opponent_pieces: bool,
    pub player_count: usize,
    /// Explicit players. If absent the default roster is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_configs: Option<Vec<PlayerConfig>>,
}

fn default_allow_moving() -> bool {
    true
}

impl Default for GameConfig {
    /// Two players on the default board, relocation allowed.
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_BOARD_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
            allow_moving_opponent_pieces: true,
            player_count: MIN_PLAYERS,
            player_configs: None,
        }
    }
}

/// The reasons a configuration gets rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {m}x{n}")]
    BoardTooSmall { m: usize, n: usize, min: usize },
    #[error("win length must be at least {min}, got {k}")]
    WinLengthTooShort { k: usize, min: usize },
    #[error("win length {k} exceeds the longest board side {max}")]
    WinLengthTooLong { k: usize, max: usize },
    #[error("player count must be between {min} and {max}, got {count}")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("{given} player configurations given for {expected} players")]
    PlayerConfigMismatch { expected: usize, given: usize },
}

impl GameConfig {
    /// Checks the configuration against the game limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoardSize { m, n } = self.board_size;
        if m < MIN_BOARD_DIMENSION || n < MIN_BOARD_DIMENSION {
            return Err(ConfigError::BoardTooSmall {
                m,
                n,
                min: MIN_BOARD_DIMENSION,
            });
        }
        if self.win_length < MIN_WIN_LENGTH {
            return Err(ConfigError::WinLengthTooShort {
                k: self.win_length,
                min: MIN_WIN_LENGTH,
            });
        }
        if self.win_length > self.board_size.longest_side() {
            return Err(ConfigError::WinLengthTooLong {
                k: self.win_length,
                max: self.board_size.longest_side(),
            });
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount {
                count: self.player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if let Some(configs) = &self.player_configs
            && configs.len() != self.player_count
        {
            return Err(ConfigError::PlayerConfigMismatch {
                expected: self.player_count,
                given: configs.len(),
            });
        }
        Ok(())
    }

    /// The players of this configuration, falling back to the default roster.
    pub fn resolved_player_configs(&self) -> Vec<PlayerConfig> {
        self.player_configs
            .clone()
            .unwrap_or_else(|| default_player_configs(self.player_count))
    }
}
