//! The row format shared between the game clients and the remote game store.
//! A game lives in exactly one row; every committed change is delivered to the subscribers as
//! the complete row. Field names are snake_case on the wire.

use mnk_core::{Board, BoardSize, GameConfig, MoveResult, PlayerConfig, Position, SyncPayload};
use serde::{Deserialize, Serialize};

/// The buffer size of the per game broadcast channels.
pub const CHANNEL_BUFFER_SIZE: usize = 256;

/// The query parameter that carries the game id in a shareable link.
pub const GAME_QUERY_PARAMETER: &str = "game";

/// The settings a host chooses when opening an online game.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct OnlineGameConfig {
    pub board_size: BoardSize,
    pub win_length: usize,
    pub player_configs: Vec<PlayerConfig>,
    pub allow_moving_opponent_pieces: bool,
}

impl OnlineGameConfig {
    /// The equivalent local configuration, used for validation.
    pub fn to_game_config(&self) -> GameConfig {
        GameConfig {
            board_size: self.board_size,
            win_length: self.win_length,
            allow_moving_opponent_pieces: self.allow_moving_opponent_pieces,
            player_count: self.player_configs.len(),
            player_configs: Some(self.player_configs.clone()),
        }
    }
}

impl From<&GameConfig> for OnlineGameConfig {
    fn from(config: &GameConfig) -> Self {
        OnlineGameConfig {
            board_size: config.board_size,
            win_length: config.win_length,
            player_configs: config.resolved_player_configs(),
            allow_moving_opponent_pieces: config.allow_moving_opponent_pieces,
        }
    }
}

/// The record inserted when a game gets created. The store adds the id.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct NewGameRecord {
    pub board: Board,
    pub current_player: usize,
    pub player_configs: Vec<PlayerConfig>,
    pub board_size: BoardSize,
    pub win_length: usize,
    pub game_started: bool,
    pub player_count: usize,
    pub players_joined: usize,
    /// One slot per player, holding the token of whoever claimed it.
    pub player_tokens: Vec<Option<String>>,
    pub rematch_requests: Vec<bool>,
    pub allow_moving_opponent_pieces: bool,
}

impl NewGameRecord {
    /// The creator takes slot 0, all other slots are open.
    pub fn new(config: &OnlineGameConfig, creator_token: &str) -> Self {
        let player_count = config.player_configs.len();
        let mut player_tokens = vec![None; player_count];
        if let Some(first) = player_tokens.first_mut() {
            *first = Some(creator_token.to_string());
        }
        NewGameRecord {
            board: Board::empty(config.board_size),
            current_player: 0,
            player_configs: config.player_configs.clone(),
            board_size: config.board_size,
            win_length: config.win_length,
            game_started: true,
            player_count,
            players_joined: 1,
            player_tokens,
            rematch_requests: vec![false; player_count],
            allow_moving_opponent_pieces: config.allow_moving_opponent_pieces,
        }
    }
}

/// The complete stored game.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct GameRow {
    pub id: String,
    pub board: Board,
    pub current_player: usize,
    pub player_configs: Vec<PlayerConfig>,
    pub board_size: BoardSize,
    pub win_length: usize,
    pub winner: Option<usize>,
    pub is_draw: bool,
    pub winning_cells: Vec<Position>,
    pub game_started: bool,
    pub player_count: usize,
    pub players_joined: usize,
    pub player_tokens: Vec<Option<String>>,
    pub rematch_requests: Vec<bool>,
    pub allow_moving_opponent_pieces: bool,
}

/// The move data a client hands to the store after a local move.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct MoveUpdate {
    pub board: Board,
    pub current_player: usize,
    pub winner: Option<usize>,
    pub is_draw: bool,
    pub winning_cells: Vec<Position>,
}

impl From<MoveResult> for MoveUpdate {
    fn from(result: MoveResult) -> Self {
        MoveUpdate {
            board: result.new_board,
            current_player: result.next_player,
            winner: result.winner,
            is_draw: result.is_draw,
            winning_cells: result.winning_cells,
        }
    }
}

/// The changes a client may commit to a row.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum RowPatch {
    /// The result of a move.
    Move(MoveUpdate),
    /// A player claimed a slot.
    Join {
        player_tokens: Vec<Option<String>>,
        players_joined: usize,
    },
    /// The rematch votes changed.
    RematchVotes(Vec<bool>),
    /// Everybody agreed on a rematch: fresh board, player 0 to move, votes cleared.
    RematchReset,
}

/// The phases of an online game as seen by one client.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OnlineStatus {
    Creating,
    Joining,
    /// Not all seats are taken yet.
    Waiting,
    Playing,
    Finished,
    Error,
}

impl GameRow {
    /// Builds the stored row from a creation record.
    pub fn from_record(id: String, record: NewGameRecord) -> Self {
        GameRow {
            id,
            board: record.board,
            current_player: record.current_player,
            player_configs: record.player_configs,
            board_size: record.board_size,
            win_length: record.win_length,
            winner: None,
            is_draw: false,
            winning_cells: Vec::new(),
            game_started: record.game_started,
            player_count: record.player_count,
            players_joined: record.players_joined,
            player_tokens: record.player_tokens,
            rematch_requests: record.rematch_requests,
            allow_moving_opponent_pieces: record.allow_moving_opponent_pieces,
        }
    }

    /// Writes the patch into the row.
    pub fn apply_patch(&mut self, patch: RowPatch) {
        match patch {
            RowPatch::Move(update) => {
                self.board = update.board;
                self.current_player = update.current_player;
                self.winner = update.winner;
                self.is_draw = update.is_draw;
                self.winning_cells = update.winning_cells;
            }
            RowPatch::Join {
                player_tokens,
                players_joined,
            } => {
                self.player_tokens = player_tokens;
                self.players_joined = players_joined;
            }
            RowPatch::RematchVotes(votes) => {
                self.rematch_requests = votes;
            }
            RowPatch::RematchReset => {
                self.board = Board::empty(self.board_size);
                self.current_player = 0;
                self.winner = None;
                self.is_draw = false;
                self.winning_cells = Vec::new();
                self.game_started = true;
                self.rematch_requests = vec![false; self.player_count];
            }
        }
    }

    /// Waiting until every seat is taken, finished once there is a result, playing otherwise.
    pub fn status(&self) -> OnlineStatus {
        if self.players_joined < self.player_count {
            OnlineStatus::Waiting
        } else if self.winner.is_some() || self.is_draw {
            OnlineStatus::Finished
        } else {
            OnlineStatus::Playing
        }
    }

    /// The slot owned by the token, if any.
    pub fn slot_of(&self, token: &str) -> Option<usize> {
        self.player_tokens
            .iter()
            .position(|slot| slot.as_deref() == Some(token))
    }

    /// The first unclaimed slot.
    pub fn first_free_slot(&self) -> Option<usize> {
        self.player_tokens.iter().position(Option::is_none)
    }

    /// The authoritative game fields of this row for the local state machine.
    pub fn sync_payload(&self) -> SyncPayload {
        SyncPayload {
            board: self.board.clone(),
            current_player: self.current_player,
            player_configs: self.player_configs.clone(),
            board_size: self.board_size,
            win_length: self.win_length,
            winner: self.winner,
            is_draw: self.is_draw,
            winning_cells: self.winning_cells.clone(),
            game_started: self.game_started,
            rematch_requests: self.rematch_requests.clone(),
            allow_moving_opponent_pieces: self.allow_moving_opponent_pieces,
        }
    }
}
