pub mod msg;

use std::collections::HashMap;

use crate::registry::{Connection, Registry};
use msg::Message;

/// Per-room message history. A room comes into being on first append and is
/// never deleted; an unseen room is indistinguishable from an empty one.
/// History lives only in memory and dies with the process.
#[derive(Default)]
pub struct RoomStore {
    histories: HashMap<String, Vec<Message>>,
}

impl RoomStore {
    /// Messages in append order. Append is the only mutation; there is no
    /// edit, delete or truncate.
    pub fn history(&self, room_id: &str) -> &[Message] {
        self.histories.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn append(&mut self, room_id: &str, message: Message) {
        self.histories
            .entry(room_id.to_owned())
            .or_default()
            .push(message);
    }
}

/// Membership is derived from each connection's current-room field on every
/// call, so it can never drift from the registry.
pub fn members_of<'a>(
    registry: &'a Registry,
    room_id: &'a str,
) -> impl Iterator<Item = &'a Connection> {
    registry
        .iter()
        .filter(move |conn| conn.room.as_deref() == Some(room_id))
}
