//! The game core of the m,n,k-game: an m x n board where k pieces in a row win.
//!
//! The modules build on each other, leaf first:
//!
//! * [`board`]: board, positions, bounds checking and line directions.
//! * [`win_detection`]: k-in-a-row and full board checks around the last changed cell.
//! * [`interaction`]: what a click means given the current selection.
//! * [`move_processor`]: placing or relocating a piece and computing the next turn.
//! * [`game_state`]: the state machine consumed by local play and online synchronization.
//!
//! [`config`] and [`constants`] hold the configuration surface, defaults and presets.
//! Everything here is synchronous and free of side effects apart from logging.

pub mod board;
pub mod config;
pub mod constants;
pub mod game_state;
pub mod interaction;
pub mod move_processor;
pub mod win_detection;

pub use board::{Board, BoardSize, CellContent, Position};
pub use config::{ConfigError, GameConfig, PlayerConfig, PlayerConfigPatch};
pub use game_state::{GameAction, GameMachine, GameState, SyncPayload, reduce};
pub use interaction::{ClickContext, ClickOutcome, interpret_click};
pub use move_processor::{MoveResult, is_legal_move, process_move};
pub use win_detection::{WinCheck, check_draw, check_win};
