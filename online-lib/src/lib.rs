//! Online play for the m,n,k-game.
//!
//! Every game is one row in a remote store (see [`traits::GameStore`]). Clients write moves,
//! joins and rematch votes as patches and follow the row through a subscription. The
//! [`session::OnlineSession`] wraps the local state machine: it feeds each committed row into
//! it as a remote sync, so all clients converge on the last committed row.
//!
//! [`memory_store::MemoryStore`] keeps the rows in process and is what tests and the terminal
//! demo run against.

pub mod error;
pub mod link;
pub mod memory_store;
pub mod rematch;
pub mod session;
pub mod token;
pub mod traits;

pub use error::OnlineError;
pub use link::{game_id_from_url, shareable_link};
pub use memory_store::MemoryStore;
pub use rematch::{RematchInfo, rematch_info};
pub use session::{OnlineSession, OnlineState};
pub use traits::GameStore;
