//! Identifiers handed out to games and players.

use uuid::Uuid;

/// A fresh id for a stored game.
pub fn new_game_id() -> String {
    Uuid::new_v4().to_string()
}

/// A fresh player identity. A client keeps it for its lifetime, so joining the same game
/// again reconnects into the slot it already owns.
pub fn new_player_token() -> String {
    Uuid::new_v4().simple().to_string()
}
