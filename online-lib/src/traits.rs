//! The seam between the game clients and the row based remote store.
//!
//! A game is a single row. Clients insert it once, patch it on every move, join or rematch
//! vote, and follow it through a subscription that delivers every committed version of the
//! complete row.
//!
//! ```text
//! ┌──────────────┐  insert / update   ┌──────────────┐
//! │ OnlineSession│───────────────────►│  GameStore   │
//! │  (player 0)  │◄───────────────────│  (one row    │
//! └──────────────┘  committed rows    │   per game)  │
//! ┌──────────────┐                    │              │
//! │ OnlineSession│◄──────────────────►│              │
//! │  (player 1)  │                    └──────────────┘
//! └──────────────┘
//! ```
//!
//! # Ordering
//!
//! Implementations must deliver the rows of one game to every subscriber in commit order.
//! Clients replace their state wholesale with each delivered row, so the last delivered row
//! always wins and skipped rows do no harm.

use crate::error::OnlineError;
use protocol::{GameRow, NewGameRecord, RowPatch};
use std::future::Future;
use tokio::sync::broadcast;

/// A store holding one row per game.
pub trait GameStore: Send + Sync {
    /// Stores a new game and returns the complete row with its assigned id.
    fn insert_game(
        &self,
        record: NewGameRecord,
    ) -> impl Future<Output = Result<GameRow, OnlineError>> + Send;

    /// Reads the current row.
    ///
    /// Fails with [`OnlineError::GameNotFound`] for unknown ids.
    fn fetch_game(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<GameRow, OnlineError>> + Send;

    /// Commits the patch and returns the row as committed. Every subscriber of the game
    /// receives the same row.
    fn update_game(
        &self,
        game_id: &str,
        patch: RowPatch,
    ) -> impl Future<Output = Result<GameRow, OnlineError>> + Send;

    /// Subscribes to all rows committed after this call.
    fn subscribe(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<broadcast::Receiver<GameRow>, OnlineError>> + Send;
}
