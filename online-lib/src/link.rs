//! Shareable links carrying the game id as a query parameter.

use protocol::GAME_QUERY_PARAMETER;

/// Builds `"{base}?game={id}"`.
pub fn shareable_link(base: &str, game_id: &str) -> String {
    format!("{base}?{GAME_QUERY_PARAMETER}={game_id}")
}

/// Extracts the game id from a link, if it carries a non-empty one.
pub fn game_id_from_url(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == GAME_QUERY_PARAMETER)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
