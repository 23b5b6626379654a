//! The authoritative game state and the transition function that drives it.
//!
//! Every transition produces a fresh [`GameState`]; nothing is changed in place. Local play
//! feeds UI actions into [`reduce`], online play additionally feeds remote snapshots in
//! through [`GameAction::SyncFromRemote`].
//!
//! ```text
//!  click ──► CellClick ──► interpret_click ──► Move ──────► process_move ──► new snapshot
//!                                          └─► Select / Deselect ────────► new snapshot
//!  remote row ──► SyncFromRemote ─────────────────────────────────────────► new snapshot
//! ```

use crate::board::{Board, BoardSize, Position};
use crate::config::{GameConfig, PlayerConfig, PlayerConfigPatch};
use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_WIN_LENGTH, MAX_PLAYERS, MIN_PLAYERS, default_player_config,
    default_player_configs,
};
use crate::interaction::{ClickContext, ClickOutcome, interpret_click};
use crate::move_processor::{is_legal_move, process_move};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The complete state of one game.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Index of the player to move.
    pub current_player: usize,
    /// Players in turn order.
    pub player_configs: Vec<PlayerConfig>,
    pub board_size: BoardSize,
    pub win_length: usize,
    pub winner: Option<usize>,
    pub is_draw: bool,
    pub winning_cells: Vec<Position>,
    /// Whether play is active, as opposed to being in the menu.
    pub game_started: bool,
    pub allow_moving_opponent_pieces: bool,
    /// The source cell of a pending relocation.
    pub selected_cell: Option<Position>,
    /// Per player rematch votes, only used online.
    pub rematch_requests: Vec<bool>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            board: Board::empty(DEFAULT_BOARD_SIZE),
            current_player: 0,
            player_configs: default_player_configs(MIN_PLAYERS),
            board_size: DEFAULT_BOARD_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
            winner: None,
            is_draw: false,
            winning_cells: Vec::new(),
            game_started: false,
            allow_moving_opponent_pieces: true,
            selected_cell: None,
            rematch_requests: Vec::new(),
        }
    }
}

impl GameState {
    /// True while clicks are accepted: started, nobody has won and no draw.
    pub fn is_active(&self) -> bool {
        self.game_started && self.winner.is_none() && !self.is_draw
    }

    pub fn player_count(&self) -> usize {
        self.player_configs.len()
    }

    /// The configuration of the player to move.
    pub fn current_player_config(&self) -> Option<&PlayerConfig> {
        self.player_configs.get(self.current_player)
    }

    /// A copy with a fresh board of the indicated size, player 0 to move and no result.
    fn fresh(&self, board_size: BoardSize) -> GameState {
        GameState {
            board: Board::empty(board_size),
            current_player: 0,
            winner: None,
            is_draw: false,
            winning_cells: Vec::new(),
            game_started: true,
            selected_cell: None,
            board_size,
            ..self.clone()
        }
    }

    /// Applies a move that is already known to be legal.
    fn with_move(&self, to: Position, from: Option<Position>) -> GameState {
        let result = process_move(
            &self.board,
            to,
            self.current_player,
            self.win_length,
            self.player_count(),
            from,
        );
        if let Some(winner) = result.winner {
            tracing::info!(winner, cells = ?result.winning_cells, "Game won.");
        } else if result.is_draw {
            tracing::info!("Game ended in a draw.");
        }
        GameState {
            board: result.new_board,
            current_player: result.next_player,
            winner: result.winner,
            is_draw: result.is_draw,
            winning_cells: result.winning_cells,
            selected_cell: None,
            ..self.clone()
        }
    }
}

/// The authoritative fields of a remote snapshot. Applying it replaces them wholesale.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    pub board: Board,
    pub current_player: usize,
    pub player_configs: Vec<PlayerConfig>,
    pub board_size: BoardSize,
    pub win_length: usize,
    pub winner: Option<usize>,
    pub is_draw: bool,
    pub winning_cells: Vec<Position>,
    pub game_started: bool,
    pub rematch_requests: Vec<bool>,
    pub allow_moving_opponent_pieces: bool,
}

/// All transitions of the game state machine.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum GameAction {
    /// Starts a fresh game with the configuration.
    StartGame(GameConfig),
    /// Starts a fresh game with the current configuration.
    ResetGame,
    /// Leaves the game for the menu.
    ReturnToMenu,
    /// Grows the player list from the default roster or truncates it.
    SetPlayerCount(usize),
    /// Merges fields into one player's configuration.
    UpdatePlayerConfig {
        index: usize,
        patch: PlayerConfigPatch,
    },
    Deselect,
    SelectCell(Position),
    /// A raw click on the board, interpreted against the current selection.
    CellClick(Position),
    /// A move that bypasses the click interpreter. Ignored if it is not legal.
    ApplyMove {
        to: Position,
        from: Option<Position>,
    },
    /// A snapshot from the remote source of truth.
    SyncFromRemote(SyncPayload),
}

/// The transition function. Pure and total: actions that do not apply return an unchanged copy.
pub fn reduce(state: &GameState, action: GameAction) -> GameState {
    match action {
        GameAction::StartGame(config) => {
            if let Err(error) = config.validate() {
                tracing::warn!(%error, "Ignoring start with invalid configuration.");
                return state.clone();
            }
            tracing::info!(
                m = config.board_size.m,
                n = config.board_size.n,
                k = config.win_length,
                players = config.player_count,
                "Starting game."
            );
            GameState {
                win_length: config.win_length,
                player_configs: config.resolved_player_configs(),
                allow_moving_opponent_pieces: config.allow_moving_opponent_pieces,
                ..state.fresh(config.board_size)
            }
        }
        GameAction::ResetGame => state.fresh(state.board_size),
        GameAction::ReturnToMenu => GameState {
            game_started: false,
            selected_cell: None,
            ..state.clone()
        },
        GameAction::SetPlayerCount(count) => {
            let count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
            let mut player_configs = state.player_configs.clone();
            if count < player_configs.len() {
                player_configs.truncate(count);
            } else {
                player_configs.extend((player_configs.len()..count).map(default_player_config));
            }
            GameState {
                player_configs,
                ..state.clone()
            }
        }
        GameAction::UpdatePlayerConfig { index, patch } => {
            let mut player_configs = state.player_configs.clone();
            match player_configs.get_mut(index) {
                Some(config) => *config = config.merged(&patch),
                None => {
                    tracing::debug!(index, "Player config update for unknown player ignored.");
                }
            }
            GameState {
                player_configs,
                ..state.clone()
            }
        }
        GameAction::Deselect => GameState {
            selected_cell: None,
            ..state.clone()
        },
        GameAction::SelectCell(cell) => GameState {
            selected_cell: Some(cell),
            ..state.clone()
        },
        GameAction::CellClick(click) => {
            if !state.is_active() || !state.board.contains(click) {
                tracing::debug!(?click, "Click on inactive game or off the board ignored.");
                return state.clone();
            }
            let outcome = interpret_click(&ClickContext {
                board: &state.board,
                current_player: state.current_player,
                selected_cell: state.selected_cell,
                allow_moving_opponent_pieces: state.allow_moving_opponent_pieces,
                click,
            });
            apply_outcome(state, outcome)
        }
        GameAction::ApplyMove { to, from } => {
            let legal = is_legal_move(
                &state.board,
                to,
                state.current_player,
                from,
                state.allow_moving_opponent_pieces,
            );
            if !state.is_active() || !legal {
                tracing::debug!(?to, ?from, "Illegal or late move ignored.");
                return state.clone();
            }
            state.with_move(to, from)
        }
        GameAction::SyncFromRemote(payload) => GameState {
            board: payload.board,
            current_player: payload.current_player,
            player_configs: payload.player_configs,
            board_size: payload.board_size,
            win_length: payload.win_length,
            winner: payload.winner,
            is_draw: payload.is_draw,
            winning_cells: payload.winning_cells,
            game_started: payload.game_started,
            rematch_requests: payload.rematch_requests,
            allow_moving_opponent_pieces: payload.allow_moving_opponent_pieces,
            selected_cell: None,
        },
    }
}

/// Realizes an interpreted click on the state.
fn apply_outcome(state: &GameState, outcome: ClickOutcome) -> GameState {
    match outcome {
        ClickOutcome::Move { to, from } => state.with_move(to, from),
        ClickOutcome::Select { cell } => GameState {
            selected_cell: Some(cell),
            ..state.clone()
        },
        ClickOutcome::Deselect => GameState {
            selected_cell: None,
            ..state.clone()
        },
    }
}

/// Owns the current snapshot of one game session. Readers get a shared handle to an
/// immutable snapshot, a dispatch swaps in the next one.
#[derive(Debug, Clone, Default)]
pub struct GameMachine {
    state: Arc<GameState>,
}

impl GameMachine {
    pub fn new(state: GameState) -> Self {
        GameMachine {
            state: Arc::new(state),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Runs the transition and replaces the snapshot.
    pub fn dispatch(&mut self, action: GameAction) -> Arc<GameState> {
        self.state = Arc::new(reduce(&self.state, action));
        self.state()
    }
}
