//! The rematch vote bookkeeping. A rematch starts once every other player has voted and the
//! last missing player votes too.

use serde::{Deserialize, Serialize};

/// The vote summary from the perspective of one player.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RematchInfo {
    pub has_requested: bool,
    /// The number of other players that voted.
    pub others_count: usize,
    pub total_others: usize,
    pub all_others_want: bool,
}

/// Summarizes the votes for `player_index`. Without a seat or without votes nothing is pending.
pub fn rematch_info(votes: &[bool], player_index: Option<usize>) -> RematchInfo {
    let Some(player_index) = player_index else {
        return RematchInfo::default();
    };
    if votes.is_empty() {
        return RematchInfo::default();
    }
    let others_count = votes
        .iter()
        .enumerate()
        .filter(|&(index, &vote)| index != player_index && vote)
        .count();
    let total_others = votes.len() - 1;
    RematchInfo {
        has_requested: votes.get(player_index).copied().unwrap_or(false),
        others_count,
        total_others,
        all_others_want: others_count == total_others,
    }
}

/// True if every player except `player_index` has voted.
pub fn all_others_voted(votes: &[bool], player_index: usize) -> bool {
    votes
        .iter()
        .enumerate()
        .all(|(index, &vote)| index == player_index || vote)
}
