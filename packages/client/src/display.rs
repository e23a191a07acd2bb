//! Rendering of broadcasts for the terminal.

use cursorhub_server::infrastructure::dto::websocket::BroadcastPayload;

/// One line per session, sorted by username then session id.
/// The session matching `username` is marked with `*`.
pub fn format_broadcast(payload: &BroadcastPayload, username: &str) -> Vec<String> {
    let mut entries: Vec<_> = payload.iter().collect();
    entries.sort_by(|(a_id, a), (b_id, b)| a.username.cmp(&b.username).then_with(|| a_id.cmp(b_id)));

    entries
        .into_iter()
        .map(|(_, entry)| {
            let marker = if entry.username == username { '*' } else { ' ' };
            let s = &entry.state;
            format!(
                "{marker} {:<16} x={:>9.1} y={:>9.1} spd={:>8.4} ang={:>7.1}°",
                entry.username,
                s.x,
                s.y,
                s.spd,
                s.ang.to_degrees()
            )
        })
        .collect()
}
