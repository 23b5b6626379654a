//! The failures of the transport boundary. Everything below this layer is total.

use mnk_core::{ConfigError, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnlineError {
    #[error("Game {0} not found. The link may be invalid or the game has expired.")]
    GameNotFound(String),
    #[error("This game is already full.")]
    GameFull,
    #[error("Not connected to an online game.")]
    NotInGame,
    #[error("It is not your turn.")]
    NotYourTurn,
    #[error("The game is still running.")]
    GameNotFinished,
    #[error("Illegal move to {to:?}.")]
    IllegalMove { to: Position },
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("The store rejected the write: {0}")]
    Rejected(String),
    #[error("The update channel was closed.")]
    Disconnected,
}
