use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::events::ServerEvent;

pub const DEFAULT_NICK: &str = "Anon";

pub type ConnectionId = Uuid;

/// One live connection: identity, profile, and the queue its delivery task
/// drains into the socket.
pub struct Connection {
    pub id: ConnectionId,
    pub nick: Option<String>,
    pub room: Option<String>,
    tx: UnboundedSender<ServerEvent>,
}

impl Connection {
    pub fn nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(DEFAULT_NICK)
    }

    /// Fire-and-forget. A closed receiver means the connection is already
    /// tearing down; its disconnect will clean up the registry entry.
    pub fn send(&self, event: ServerEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Default)]
pub struct Registry {
    conns: HashMap<ConnectionId, Connection>,
}

impl Registry {
    pub fn register(&mut self, tx: UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = Uuid::now_v7();
        self.conns.insert(
            id,
            Connection {
                id,
                nick: None,
                room: None,
                tx,
            },
        );
        id
    }

    /// No-op for an unknown id.
    pub fn set_profile(&mut self, id: ConnectionId, nick: String, room: String) {
        if let Some(conn) = self.conns.get_mut(&id) {
            conn.nick = Some(nick);
            conn.room = Some(room);
        }
    }

    pub fn lookup(&self, id: ConnectionId) -> Option<&Connection> {
        self.conns.get(&id)
    }

    /// Returns the removed record so callers can announce the departure.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Connection> {
        self.conns.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.conns.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn sender() -> UnboundedSender<ServerEvent> {
        mpsc::unbounded_channel().0
    }

    #[test]
    fn register_allocates_distinct_ids() {
        let mut registry = Registry::default();
        let a = registry.register(sender());
        let b = registry.register(sender());
        assert_ne!(a, b);
        assert!(registry.lookup(a).is_some());
        assert!(registry.lookup(b).is_some());
    }

    #[test]
    fn nick_defaults_until_profile_is_set() {
        let mut registry = Registry::default();
        let id = registry.register(sender());
        assert_eq!(registry.lookup(id).unwrap().nick(), DEFAULT_NICK);
        assert_eq!(registry.lookup(id).unwrap().room, None);

        registry.set_profile(id, "Alice".to_owned(), "r1".to_owned());
        let conn = registry.lookup(id).unwrap();
        assert_eq!(conn.nick(), "Alice");
        assert_eq!(conn.room.as_deref(), Some("r1"));
    }

    #[test]
    fn unregister_returns_the_record_once() {
        let mut registry = Registry::default();
        let id = registry.register(sender());
        registry.set_profile(id, "Bob".to_owned(), "r1".to_owned());

        let removed = registry.unregister(id).unwrap();
        assert_eq!(removed.nick(), "Bob");
        assert!(registry.lookup(id).is_none());
        assert!(registry.unregister(id).is_none());
    }

    #[test]
    fn set_profile_on_unknown_id_is_a_noop() {
        let mut registry = Registry::default();
        registry.set_profile(Uuid::now_v7(), "Ghost".to_owned(), "r1".to_owned());
        assert_eq!(registry.iter().count(), 0);
    }
}
