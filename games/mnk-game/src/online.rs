//! Online play on one terminal: every seat runs its own session against an in-process store,
//! and the prompt always speaks for the seat whose turn it is.

use crate::command::{Command, HELP, parse_command};
use crate::local::Flow;
use crate::render::{render_board, status_line};
use mnk_core::GameConfig;
use online_lib::{MemoryStore, OnlineError, OnlineSession, game_id_from_url};
use protocol::{OnlineGameConfig, OnlineStatus};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

/// The base of the links handed out for the games of this table.
const BASE_URL: &str = "https://mnk.local/play";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Online(#[from] OnlineError),
}

/// All seats of one online game.
pub struct Table {
    sessions: Vec<OnlineSession<MemoryStore>>,
}

impl Table {
    /// Creates the game with seat 0 and lets the other seats join through the shared link.
    pub async fn open(config: &GameConfig) -> Result<Self, OnlineError> {
        let store = Arc::new(MemoryStore::new());
        let online_config = OnlineGameConfig::from(config);
        let mut host = OnlineSession::new(store.clone());
        host.create_game(&online_config).await?;
        let link = host.shareable_link(BASE_URL).ok_or(OnlineError::NotInGame)?;
        tracing::info!(%link, "Game created.");

        let game_id = game_id_from_url(&link).ok_or(OnlineError::NotInGame)?;
        let mut sessions = vec![host];
        for _ in 1..online_config.player_configs.len() {
            let mut guest = OnlineSession::new(store.clone());
            guest.join_game(&game_id).await?;
            sessions.push(guest);
        }
        let mut table = Table { sessions };
        table.sync()?;
        Ok(table)
    }

    /// The seat the prompt speaks for: the player to move, or seat 0 while nobody may move.
    pub fn active_seat(&self) -> usize {
        self.sessions
            .iter()
            .position(|session| session.is_my_turn())
            .unwrap_or(0)
    }

    pub fn session(&self, seat: usize) -> Option<&OnlineSession<MemoryStore>> {
        self.sessions.get(seat)
    }

    /// Pulls the committed rows into every seat.
    fn sync(&mut self) -> Result<(), OnlineError> {
        for session in &mut self.sessions {
            session.poll_updates()?;
        }
        Ok(())
    }

    /// Runs one command. Store failures are returned and leave every seat as it was.
    pub async fn apply(&mut self, command: Command) -> Result<(Flow, Option<String>), OnlineError> {
        let seat = self.active_seat();
        let message = match command {
            Command::Quit => return Ok((Flow::Quit, None)),
            Command::Menu => {
                for session in &mut self.sessions {
                    session.leave();
                }
                return Ok((Flow::Quit, None));
            }
            Command::Help => Some(HELP.to_string()),
            Command::Link => self.sessions[seat].shareable_link(BASE_URL),
            Command::Click(position) => {
                self.sessions[seat].click(position).await?;
                None
            }
            Command::Deselect => {
                self.sessions[seat].deselect();
                None
            }
            Command::Rematch => {
                let Some(voter) = self
                    .sessions
                    .iter()
                    .position(|session| !session.rematch_info().has_requested)
                else {
                    return Ok((Flow::Continue, Some("Everybody voted already.".into())));
                };
                self.sessions[voter].request_rematch().await?;
                Some(format!("Seat {voter} votes for a rematch."))
            }
            Command::Reset | Command::Start | Command::Players(_) => {
                Some("Not available online, use 'rematch'.".to_string())
            }
        };
        self.sync()?;
        Ok((Flow::Continue, message))
    }

    fn print(&self) {
        let seat = self.active_seat();
        let session = &self.sessions[seat];
        let state = session.state();
        let online = session.online_state();
        println!("{}", render_board(&state));
        println!("{}", status_line(&state));
        println!(
            "Seat {seat}, {}/{} players joined",
            online.players_joined, online.player_count
        );
        if online.status == OnlineStatus::Finished {
            let votes = state.rematch_requests.iter().filter(|&&vote| vote).count();
            println!("Rematch votes: {votes}/{}", state.rematch_requests.len());
        }
    }
}

/// Reads commands from stdin until quit, menu or end of input.
pub async fn run_online(config: GameConfig) -> Result<(), RunError> {
    let mut table = Table::open(&config).await?;
    table.print();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            println!("Unknown command, type 'help'.");
            continue;
        };
        match table.apply(command).await {
            Ok((Flow::Quit, _)) => break,
            Ok((Flow::Continue, message)) => {
                if let Some(message) = message {
                    println!("{message}");
                }
            }
            Err(error) => println!("{error}"),
        }
        table.print();
    }
    Ok(())
}
