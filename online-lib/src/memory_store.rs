//! An in-process [`GameStore`]. Rows live in a map guarded by one lock; each game owns a
//! broadcast channel that fans the committed rows out to the subscribed sessions.

use crate::error::OnlineError;
use crate::token::new_game_id;
use crate::traits::GameStore;
use protocol::{CHANNEL_BUFFER_SIZE, GameRow, NewGameRecord, RowPatch};
use std::collections::HashMap;
use tokio::sync::{Mutex, broadcast};

/// One stored game.
struct StoredGame {
    row: GameRow,
    /// Clone-able, subscribers are created from it.
    broadcaster: broadcast::Sender<GameRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<String, StoredGame>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored games.
    pub async fn game_count(&self) -> usize {
        self.games.lock().await.len()
    }

    /// Drops the game. Subscribers see their channel closing.
    pub async fn remove_game(&self, game_id: &str) -> bool {
        let removed = self.games.lock().await.remove(game_id).is_some();
        if removed {
            tracing::info!(game_id, "Removed game.");
        }
        removed
    }
}

impl GameStore for MemoryStore {
    async fn insert_game(&self, record: NewGameRecord) -> Result<GameRow, OnlineError> {
        let id = new_game_id();
        let row = GameRow::from_record(id.clone(), record);
        let (broadcaster, _) = broadcast::channel(CHANNEL_BUFFER_SIZE);
        let mut games = self.games.lock().await;
        games.insert(
            id.clone(),
            StoredGame {
                row: row.clone(),
                broadcaster,
            },
        );
        tracing::info!(game_id = %id, players = row.player_count, "Created game.");
        Ok(row)
    }

    async fn fetch_game(&self, game_id: &str) -> Result<GameRow, OnlineError> {
        let games = self.games.lock().await;
        games
            .get(game_id)
            .map(|game| game.row.clone())
            .ok_or_else(|| OnlineError::GameNotFound(game_id.to_string()))
    }

    async fn update_game(&self, game_id: &str, patch: RowPatch) -> Result<GameRow, OnlineError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| OnlineError::GameNotFound(game_id.to_string()))?;
        game.row.apply_patch(patch);
        // Sent while the lock is held, so all subscribers see the commit order.
        if game.broadcaster.send(game.row.clone()).is_err() {
            tracing::debug!(game_id, "Committed row without subscribers.");
        }
        Ok(game.row.clone())
    }

    async fn subscribe(
        &self,
        game_id: &str,
    ) -> Result<broadcast::Receiver<GameRow>, OnlineError> {
        let games = self.games.lock().await;
        games
            .get(game_id)
            .map(|game| game.broadcaster.subscribe())
            .ok_or_else(|| OnlineError::GameNotFound(game_id.to_string()))
    }
}
