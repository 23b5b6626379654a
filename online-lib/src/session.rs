//! The client side of one online game.
//!
//! A session owns the local [`GameMachine`] and the subscription to the game row. It never
//! applies its own moves locally: a move is written to the store and comes back through the
//! subscription like every other player's move. Call [`OnlineSession::poll_updates`] once per
//! frame, or await [`OnlineSession::next_update`], to pull the committed rows in.

use crate::error::OnlineError;
use crate::link::shareable_link;
use crate::rematch::{RematchInfo, all_others_voted, rematch_info};
use crate::token::new_player_token;
use crate::traits::GameStore;
use mnk_core::{
    ClickContext, ClickOutcome, GameAction, GameMachine, GameState, Position, interpret_click,
    is_legal_move, process_move,
};
use protocol::{GameRow, NewGameRecord, OnlineGameConfig, OnlineStatus, RowPatch};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// What the client knows about its seat in the online game.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct OnlineState {
    pub game_id: Option<String>,
    /// The seat of this client, which is also the index of its pieces.
    pub player_index: Option<usize>,
    pub player_token: Option<String>,
    pub status: OnlineStatus,
    /// The reason for the last failure, shown until the next create or join.
    pub error: Option<String>,
    pub players_joined: usize,
    pub player_count: usize,
}

impl Default for OnlineState {
    fn default() -> Self {
        OnlineState {
            game_id: None,
            player_index: None,
            player_token: None,
            status: OnlineStatus::Creating,
            error: None,
            players_joined: 0,
            player_count: 0,
        }
    }
}

pub struct OnlineSession<S: GameStore> {
    store: Arc<S>,
    /// The identity of this client. Joining a game it already sits in reconnects the seat.
    player_token: String,
    machine: GameMachine,
    online_state: OnlineState,
    subscription: Option<broadcast::Receiver<GameRow>>,
}

impl<S: GameStore> OnlineSession<S> {
    /// A session with a fresh player identity.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_token(store, new_player_token())
    }

    /// A session with a known identity, used to reconnect after a restart.
    pub fn with_token(store: Arc<S>, player_token: String) -> Self {
        OnlineSession {
            store,
            player_token,
            machine: GameMachine::default(),
            online_state: OnlineState::default(),
            subscription: None,
        }
    }

    /// The current local snapshot.
    pub fn state(&self) -> Arc<GameState> {
        self.machine.state()
    }

    pub fn online_state(&self) -> &OnlineState {
        &self.online_state
    }

    pub fn player_token(&self) -> &str {
        &self.player_token
    }

    /// True if this client is seated and it is its turn in a running game.
    pub fn is_my_turn(&self) -> bool {
        let state = self.machine.state();
        self.online_state.status == OnlineStatus::Playing
            && state.is_active()
            && self.online_state.player_index == Some(state.current_player)
    }

    /// The rematch votes as seen from this seat.
    pub fn rematch_info(&self) -> RematchInfo {
        rematch_info(
            &self.machine.state().rematch_requests,
            self.online_state.player_index,
        )
    }

    /// The link other players open to join, once a game exists.
    pub fn shareable_link(&self, base: &str) -> Option<String> {
        self.online_state
            .game_id
            .as_deref()
            .map(|game_id| shareable_link(base, game_id))
    }

    /// Opens a new game with this client in seat 0. Returns the game id.
    pub async fn create_game(&mut self, config: &OnlineGameConfig) -> Result<String, OnlineError> {
        self.online_state.status = OnlineStatus::Creating;
        self.online_state.error = None;
        let result = self.try_create(config).await;
        if let Err(error) = &result {
            self.set_error(error);
        }
        result
    }

    async fn try_create(&mut self, config: &OnlineGameConfig) -> Result<String, OnlineError> {
        config.to_game_config().validate()?;
        let record = NewGameRecord::new(config, &self.player_token);
        let row = self.store.insert_game(record).await?;
        let game_id = row.id.clone();
        self.sync_and_subscribe(row, 0).await?;
        Ok(game_id)
    }

    /// Takes a seat in an existing game. A client that already owns a seat gets it back.
    /// Returns the seat index.
    pub async fn join_game(&mut self, game_id: &str) -> Result<usize, OnlineError> {
        self.online_state.status = OnlineStatus::Joining;
        self.online_state.error = None;
        let result = self.try_join(game_id).await;
        if let Err(error) = &result {
            self.set_error(error);
        }
        result
    }

    async fn try_join(&mut self, game_id: &str) -> Result<usize, OnlineError> {
        let row = self.store.fetch_game(game_id).await?;

        if let Some(slot) = row.slot_of(&self.player_token) {
            tracing::info!(game_id, slot, "Reconnected to game.");
            self.sync_and_subscribe(row, slot).await?;
            return Ok(slot);
        }

        let slot = match row.first_free_slot() {
            Some(slot) if row.players_joined < row.player_count => slot,
            _ => return Err(OnlineError::GameFull),
        };
        let mut player_tokens = row.player_tokens.clone();
        player_tokens[slot] = Some(self.player_token.clone());
        let patch = RowPatch::Join {
            player_tokens,
            players_joined: row.players_joined + 1,
        };
        let row = self.store.update_game(game_id, patch).await?;
        tracing::info!(game_id, slot, joined = row.players_joined, "Joined game.");
        self.sync_and_subscribe(row, slot).await?;
        Ok(slot)
    }

    /// Handles a board click. Only the player to move may click; selections stay local,
    /// moves are written to the store.
    pub async fn click(&mut self, click: Position) -> Result<(), OnlineError> {
        if self.online_state.game_id.is_none() {
            return Err(OnlineError::NotInGame);
        }
        if !self.is_my_turn() {
            tracing::debug!(?click, "Click outside of own turn ignored.");
            return Ok(());
        }
        let state = self.machine.state();
        if !state.board.contains(click) {
            return Ok(());
        }
        let outcome = interpret_click(&ClickContext {
            board: &state.board,
            current_player: state.current_player,
            selected_cell: state.selected_cell,
            allow_moving_opponent_pieces: state.allow_moving_opponent_pieces,
            click,
        });
        match outcome {
            ClickOutcome::Move { to, from } => self.make_move(to, from).await,
            ClickOutcome::Select { cell } => {
                self.machine.dispatch(GameAction::SelectCell(cell));
                Ok(())
            }
            ClickOutcome::Deselect => {
                self.machine.dispatch(GameAction::Deselect);
                Ok(())
            }
        }
    }

    /// Clears a pending selection.
    pub fn deselect(&mut self) {
        self.machine.dispatch(GameAction::Deselect);
    }

    /// Computes the move with this client as mover and writes the result to the store. The
    /// local state stays as it is until the committed row arrives, also when the write fails.
    pub async fn make_move(
        &mut self,
        to: Position,
        from: Option<Position>,
    ) -> Result<(), OnlineError> {
        let (Some(game_id), Some(player_index)) = (
            self.online_state.game_id.clone(),
            self.online_state.player_index,
        ) else {
            return Err(OnlineError::NotInGame);
        };
        let state = self.machine.state();
        if state.current_player != player_index {
            return Err(OnlineError::NotYourTurn);
        }
        let legal = is_legal_move(
            &state.board,
            to,
            player_index,
            from,
            state.allow_moving_opponent_pieces,
        );
        if !state.is_active() || !legal {
            return Err(OnlineError::IllegalMove { to });
        }
        let result = process_move(
            &state.board,
            to,
            player_index,
            state.win_length,
            state.player_count(),
            from,
        );
        if let Err(error) = self
            .store
            .update_game(&game_id, RowPatch::Move(result.into()))
            .await
        {
            tracing::error!(%error, %game_id, "Failed to make move.");
            return Err(error);
        }
        Ok(())
    }

    /// Votes for a rematch once the game has ended. The vote that completes the set resets the
    /// game instead.
    pub async fn request_rematch(&mut self) -> Result<(), OnlineError> {
        let (Some(game_id), Some(player_index)) = (
            self.online_state.game_id.clone(),
            self.online_state.player_index,
        ) else {
            return Err(OnlineError::NotInGame);
        };
        let state = self.machine.state();
        if state.winner.is_none() && !state.is_draw {
            return Err(OnlineError::GameNotFinished);
        }
        let mut votes = state.rematch_requests.clone();
        if all_others_voted(&votes, player_index) {
            self.store
                .update_game(&game_id, RowPatch::RematchReset)
                .await?;
            tracing::info!(%game_id, "Rematch started.");
            self.online_state.status = OnlineStatus::Playing;
        } else {
            if let Some(vote) = votes.get_mut(player_index) {
                *vote = true;
            }
            self.store
                .update_game(&game_id, RowPatch::RematchVotes(votes))
                .await?;
            tracing::debug!(%game_id, player_index, "Rematch vote recorded.");
        }
        Ok(())
    }

    /// Applies every row that arrived since the last call. Returns the number of rows applied.
    pub fn poll_updates(&mut self) -> Result<usize, OnlineError> {
        let mut applied = 0;
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return Err(OnlineError::NotInGame);
            };
            match subscription.try_recv() {
                Ok(row) => {
                    self.apply_row(&row);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => return Ok(applied),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Lagging behind the game updates.");
                }
                Err(TryRecvError::Closed) => {
                    self.subscription = None;
                    let error = OnlineError::Disconnected;
                    self.set_error(&error);
                    return Err(error);
                }
            }
        }
    }

    /// Waits for the next row and applies it.
    pub async fn next_update(&mut self) -> Result<Arc<GameState>, OnlineError> {
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return Err(OnlineError::NotInGame);
            };
            match subscription.recv().await {
                Ok(row) => {
                    self.apply_row(&row);
                    return Ok(self.machine.state());
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Lagging behind the game updates.");
                }
                Err(RecvError::Closed) => {
                    self.subscription = None;
                    let error = OnlineError::Disconnected;
                    self.set_error(&error);
                    return Err(error);
                }
            }
        }
    }

    /// Drops the subscription and forgets the seat. The last game state stays visible.
    pub fn leave(&mut self) {
        if let Some(game_id) = self.online_state.game_id.as_deref() {
            tracing::info!(game_id, "Left game.");
        }
        self.subscription = None;
        self.online_state = OnlineState::default();
    }

    async fn sync_and_subscribe(&mut self, row: GameRow, slot: usize) -> Result<(), OnlineError> {
        let subscription = self.store.subscribe(&row.id).await?;
        self.subscription = Some(subscription);
        self.online_state = OnlineState {
            game_id: Some(row.id.clone()),
            player_index: Some(slot),
            player_token: Some(self.player_token.clone()),
            status: row.status(),
            error: None,
            players_joined: row.players_joined,
            player_count: row.player_count,
        };
        self.machine
            .dispatch(GameAction::SyncFromRemote(row.sync_payload()));
        Ok(())
    }

    fn apply_row(&mut self, row: &GameRow) {
        self.machine
            .dispatch(GameAction::SyncFromRemote(row.sync_payload()));
        self.online_state.status = row.status();
        self.online_state.players_joined = row.players_joined;
        self.online_state.player_count = row.player_count;
    }

    fn set_error(&mut self, error: &OnlineError) {
        tracing::error!(%error, "Online game failure.");
        self.online_state.status = OnlineStatus::Error;
        self.online_state.error = Some(error.to_string());
    }
}
