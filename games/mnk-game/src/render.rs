//! Text rendering of the board and the status line.

use mnk_core::{CellContent, GameState, Position};

/// The symbol shown for a player. Falls back to the index for unknown players.
fn symbol_of(state: &GameState, player: usize) -> String {
    state
        .player_configs
        .get(player)
        .map(|config| config.symbol.clone())
        .unwrap_or_else(|| player.to_string())
}

fn name_of(state: &GameState, player: usize) -> String {
    state
        .player_configs
        .get(player)
        .map(|config| config.name.clone())
        .unwrap_or_else(|| format!("Player {}", player + 1))
}

/// Draws the board with row and column numbers. Selected cells are put into brackets,
/// winning cells into parentheses.
pub fn render_board(state: &GameState) -> String {
    let mut out = String::from("    ");
    for col in 0..state.board.size().n {
        out.push_str(&format!("{col:^4}"));
    }
    out.push('\n');

    for (row, cells) in state.board.rows().iter().enumerate() {
        out.push_str(&format!("{row:>3} "));
        for (col, cell) in cells.iter().enumerate() {
            let pos = Position::new(row, col);
            let content = match cell {
                CellContent::Piece(player) => symbol_of(state, *player),
                CellContent::Empty => "·".to_string(),
            };
            let cell = if state.selected_cell == Some(pos) {
                format!("[{content}]")
            } else if state.winning_cells.contains(&pos) {
                format!("({content})")
            } else {
                format!(" {content} ")
            };
            out.push_str(&cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// One line describing whose turn it is or how the game ended.
pub fn status_line(state: &GameState) -> String {
    if !state.game_started {
        return format!(
            "In the menu with {} players. Type 'start' to play.",
            state.player_count()
        );
    }
    if let Some(winner) = state.winner {
        return format!("{} {} wins!", symbol_of(state, winner), name_of(state, winner));
    }
    if state.is_draw {
        return "Draw, the board is full.".to_string();
    }
    let mut line = match state.current_player_config() {
        Some(player) => format!("{} {} to move", player.symbol, player.name),
        None => format!("Player {} to move", state.current_player + 1),
    };
    line.push_str(&format!(" ({} in a row wins)", state.win_length));
    if let Some(cell) = state.selected_cell {
        line.push_str(&format!(", moving the piece at {} {}", cell.row, cell.col));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnk_core::{BoardSize, GameAction, GameConfig, reduce};

    fn started() -> GameState {
        reduce(
            &GameState::default(),
            GameAction::StartGame(GameConfig {
                board_size: BoardSize::new(3, 4),
                win_length: 3,
                ..GameConfig::default()
            }),
        )
    }

    #[test]
    fn board_has_header_and_one_line_per_row() {
        let state = reduce(&started(), GameAction::CellClick(Position::new(1, 2)));
        let text = render_board(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains('3'));
        assert!(lines[2].contains(&state.player_configs[0].symbol));
        assert!(!lines[1].contains(&state.player_configs[0].symbol));
    }

    #[test]
    fn selection_is_bracketed() {
        let state = reduce(&started(), GameAction::SelectCell(Position::new(0, 0)));
        assert!(render_board(&state).contains("[·]"));
        assert!(status_line(&state).contains("moving the piece at 0 0"));
    }

    #[test]
    fn status_follows_the_game() {
        assert!(status_line(&GameState::default()).contains("menu"));
        let state = started();
        assert!(status_line(&state).contains(&state.player_configs[0].name));
        let won = GameState {
            winner: Some(1),
            ..state.clone()
        };
        assert!(status_line(&won).ends_with("wins!"));
        let drawn = GameState {
            is_draw: true,
            ..state
        };
        assert!(status_line(&drawn).starts_with("Draw"));
    }
}
