use crate::{
    events::ServerEvent,
    registry::{ConnectionId, Registry},
    rooms,
};

/// Fan-out is fire-and-forget onto each member's own unbounded queue; a slow
/// socket backs up its own queue without stalling anyone else.
pub fn to_room(registry: &Registry, room_id: &str, event: ServerEvent) {
    for conn in rooms::members_of(registry, room_id) {
        conn.send(event.clone());
    }
}

pub fn to_others(registry: &Registry, room_id: &str, originator: ConnectionId, event: ServerEvent) {
    for conn in rooms::members_of(registry, room_id).filter(|conn| conn.id != originator) {
        conn.send(event.clone());
    }
}

pub fn send_to(registry: &Registry, id: ConnectionId, event: ServerEvent) {
    if let Some(conn) = registry.lookup(id) {
        conn.send(event);
    }
}
