//! The commands typed at the prompt.

use mnk_core::Position;

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Command {
    /// `<row> <col>`
    Click(Position),
    Deselect,
    Reset,
    Menu,
    Start,
    Players(usize),
    Rematch,
    Link,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <row> <col>   click a cell (place, select or move a piece)
  deselect      drop the selected piece
  reset         restart with the same settings
  menu          leave the game (online: leave and quit)
  start         start a game from the menu
  players <n>   change the number of players in the menu
  rematch       vote for a rematch (online)
  link          show the link to the online game
  help          show this text
  quit          exit";

/// Parses one input line. Returns `None` for anything unknown.
pub fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [row, col] if row.parse::<usize>().is_ok() => {
            Command::Click(Position::new(row.parse().ok()?, col.parse().ok()?))
        }
        ["deselect" | "d"] => Command::Deselect,
        ["reset"] => Command::Reset,
        ["menu"] => Command::Menu,
        ["start"] => Command::Start,
        ["players", count] => Command::Players(count.parse().ok()?),
        ["rematch"] => Command::Rematch,
        ["link"] => Command::Link,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit" | "q"] => Command::Quit,
        _ => return None,
    };
    Some(command)
}
