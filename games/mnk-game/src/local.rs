//! Hot-seat play on one machine.

use crate::command::{Command, HELP, parse_command};
use crate::render::{render_board, status_line};
use mnk_core::{GameAction, GameConfig, GameMachine, GameState};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Whether the prompt loop goes on.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

/// The configuration used when starting from the menu: the board settings of the command
/// line with the players as edited in the menu.
fn menu_config(config: &GameConfig, state: &GameState) -> GameConfig {
    GameConfig {
        player_count: state.player_count(),
        player_configs: Some(state.player_configs.clone()),
        ..config.clone()
    }
}

/// Runs one command against the local game. Returns a message for commands that did nothing.
pub fn apply_local_command(
    machine: &mut GameMachine,
    config: &GameConfig,
    command: Command,
) -> (Flow, Option<&'static str>) {
    let state = machine.state();
    let action = match command {
        Command::Quit => return (Flow::Quit, None),
        Command::Help => return (Flow::Continue, Some(HELP)),
        Command::Rematch | Command::Link => {
            return (Flow::Continue, Some("Only available in online games."));
        }
        Command::Click(position) => GameAction::CellClick(position),
        Command::Deselect => GameAction::Deselect,
        Command::Reset => GameAction::ResetGame,
        Command::Menu => GameAction::ReturnToMenu,
        Command::Start if !state.game_started => GameAction::StartGame(menu_config(config, &state)),
        Command::Players(count) if !state.game_started => GameAction::SetPlayerCount(count),
        Command::Start | Command::Players(_) => {
            return (Flow::Continue, Some("Go to the menu first."));
        }
    };
    machine.dispatch(action);
    (Flow::Continue, None)
}

fn print_state(state: &GameState) {
    if state.game_started {
        println!("{}", render_board(state));
    }
    println!("{}", status_line(state));
}

/// Reads commands from stdin until quit or end of input.
pub async fn run_local(config: GameConfig) -> std::io::Result<()> {
    let mut machine = GameMachine::default();
    machine.dispatch(GameAction::StartGame(config.clone()));
    print_state(&machine.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            println!("Unknown command, type 'help'.");
            continue;
        };
        let (flow, message) = apply_local_command(&mut machine, &config, command);
        if flow == Flow::Quit {
            break;
        }
        if let Some(message) = message {
            println!("{message}");
        }
        print_state(&machine.state());
    }
    Ok(())
}
