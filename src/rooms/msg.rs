use serde::Serialize;
use time::OffsetDateTime;

use crate::registry::ConnectionId;

/// A chat message, immutable once built. The sender's nick is captured at
/// send time rather than looked up later, so a later rename or departure
/// does not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub nick: String,
    pub text: String,
    pub ts: i64,
}

impl Message {
    /// The id is connection id plus timestamp; two sends from one connection
    /// in the same millisecond share an id, which is accepted.
    pub fn new(sender: ConnectionId, nick: String, text: String) -> Self {
        let ts = now_ms();
        Self {
            id: format!("{sender}-{ts}"),
            nick,
            text,
            ts,
        }
    }
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
