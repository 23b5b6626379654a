//! Constants used throughout the game: defaults, limits, the default player roster and the presets.

use crate::board::BoardSize;
use crate::config::{GameConfig, PlayerConfig};

/// Default board size, 15 x 15.
pub const DEFAULT_BOARD_SIZE: BoardSize = BoardSize { m: 15, n: 15 };
/// Default number of pieces in a row needed to win.
pub const DEFAULT_WIN_LENGTH: usize = 5;

/// The smallest allowed amount of rows and columns.
pub const MIN_BOARD_DIMENSION: usize = 3;
/// The smallest allowed win length.
pub const MIN_WIN_LENGTH: usize = 3;
/// The minimum amount of players.
pub const MIN_PLAYERS: usize = 2;
/// The maximum amount of players, also the size of the default roster.
pub const MAX_PLAYERS: usize = 8;

/// One entry of the default roster: name, symbol, color.
pub struct RosterEntry {
    pub name: &'static str,
    pub symbol: &'static str,
    pub color: &'static str,
}

use RosterEntry as R;
/// The default player configurations used for padding the player list.
#[rustfmt::skip]
pub const DEFAULT_ROSTER: [RosterEntry; MAX_PLAYERS] = [
    R { name: "Player 1", symbol: "🦊", color: "#EF4444" },
    R { name: "Player 2", symbol: "🐼", color: "#3B82F6" },
    R { name: "Player 3", symbol: "🦄", color: "#10B981" },
    R { name: "Player 4", symbol: "🐯", color: "#F59E0B" },
    R { name: "Player 5", symbol: "🐸", color: "#8B5CF6" },
    R { name: "Player 6", symbol: "🦁", color: "#EC4899" },
    R { name: "Player 7", symbol: "🐙", color: "#06B6D4" },
    R { name: "Player 8", symbol: "🦉", color: "#D97706" },
];

/// Gets the default configuration for the player with the indicated index.
/// Indices beyond the roster get a generated name and reuse the roster symbols cyclically.
pub fn default_player_config(index: usize) -> PlayerConfig {
    let entry = &DEFAULT_ROSTER[index % MAX_PLAYERS];
    let name = if index < MAX_PLAYERS {
        entry.name.to_string()
    } else {
        format!("Player {}", index + 1)
    };
    PlayerConfig {
        name,
        symbol: entry.symbol.to_string(),
        color: entry.color.to_string(),
    }
}

/// The first `count` players of the default roster.
pub fn default_player_configs(count: usize) -> Vec<PlayerConfig> {
    (0..count).map(default_player_config).collect()
}

/// A named quick start configuration.
pub struct GamePreset {
    pub name: &'static str,
    pub board_size: BoardSize,
    pub win_length: usize,
    pub player_count: usize,
}

impl GamePreset {
    /// Converts the preset into a game configuration with default players.
    pub fn to_config(&self, allow_moving_opponent_pieces: bool) -> GameConfig {
        GameConfig {
            board_size: self.board_size,
            win_length: self.win_length,
            allow_moving_opponent_pieces,
            player_count: self.player_count,
            player_configs: None,
        }
    }
}

/// Quick start presets.
pub const GAME_PRESETS: [GamePreset; 4] = [
    GamePreset {
        name: "Classic Tic-Tac-Toe",
        board_size: BoardSize { m: 3, n: 3 },
        win_length: 3,
        player_count: 2,
    },
    GamePreset {
        name: "Gomoku (Five in a Row)",
        board_size: BoardSize { m: 15, n: 15 },
        win_length: 5,
        player_count: 2,
    },
    GamePreset {
        name: "Connect Four",
        board_size: BoardSize { m: 6, n: 7 },
        win_length: 4,
        player_count: 2,
    },
    GamePreset {
        name: "Three Players (5 in a row)",
        board_size: BoardSize { m: 15, n: 15 },
        win_length: 5,
        player_count: 3,
    },
];

/// Finds a preset by name, ignoring case. A prefix is enough as long as it is unique.
pub fn find_preset(name: &str) -> Option<&'static GamePreset> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(exact) = GAME_PRESETS.iter().find(|p| p.name.to_lowercase() == needle) {
        return Some(exact);
    }
    let mut candidates = GAME_PRESETS
        .iter()
        .filter(|p| p.name.to_lowercase().starts_with(&needle));
    match (candidates.next(), candidates.next()) {
        (Some(single), None) => Some(single),
        _ => None,
    }
}
