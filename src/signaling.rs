use serde_json::Value;
use tracing::debug;

use crate::{
    broadcast,
    events::ServerEvent,
    registry::{ConnectionId, Registry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl SignalKind {
    fn wrap(self, payload: Value) -> ServerEvent {
        match self {
            SignalKind::Offer => ServerEvent::Offer { payload },
            SignalKind::Answer => ServerEvent::Answer { payload },
            SignalKind::Candidate => ServerEvent::IceCandidate { payload },
        }
    }
}

/// Forwards a call-setup payload, untouched, to everyone else in the
/// originator's room. The payload is opaque here; its structure belongs to
/// the peers' own protocol layer. A roomless originator is silently dropped.
pub fn relay(registry: &Registry, kind: SignalKind, originator: ConnectionId, payload: Value) {
    let Some(conn) = registry.lookup(originator) else {
        return;
    };
    let Some(room_id) = conn.room.as_deref() else {
        debug!(%originator, ?kind, "signal from roomless connection dropped");
        return;
    };
    broadcast::to_others(registry, room_id, originator, kind.wrap(payload));
}
