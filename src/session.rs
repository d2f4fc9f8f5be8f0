use serde_json::Value;
use tokio::sync::{Mutex, mpsc::UnboundedSender};
use tracing::{debug, info};

use crate::{
    broadcast,
    events::{ClientEvent, ServerEvent},
    registry::{ConnectionId, DEFAULT_NICK, Registry},
    rooms::{RoomStore, msg::Message},
    signaling::{self, SignalKind},
};

/// Drives each connection through connect -> join -> active -> disconnect and
/// owns all mutable relay state. Every inbound event runs to completion under
/// one lock, so a room's appends and broadcasts form a single serial
/// sequence. Sends only push onto per-connection queues; the socket write
/// happens on that connection's own delivery task, never under this lock.
#[derive(Default)]
pub struct Hub {
    state: Mutex<HubState>,
}

#[derive(Default)]
struct HubState {
    registry: Registry,
    rooms: RoomStore,
}

impl Hub {
    pub async fn connect(&self, tx: UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = self.state.lock().await.registry.register(tx);
        info!(%id, "connection registered");
        id
    }

    pub async fn dispatch(&self, id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id, nick } => self.join(id, room_id, nick).await,
            ClientEvent::SendMessage { text } => self.message(id, text).await,
            ClientEvent::Typing { is_typing } => self.typing(id, is_typing).await,
            ClientEvent::Offer { payload } => self.signal(id, SignalKind::Offer, payload).await,
            ClientEvent::Answer { payload } => self.signal(id, SignalKind::Answer, payload).await,
            ClientEvent::IceCandidate { payload } => {
                self.signal(id, SignalKind::Candidate, payload).await
            }
        }
    }

    pub async fn join(&self, id: ConnectionId, room_id: String, nick: Option<String>) {
        let state = &mut *self.state.lock().await;
        if state.registry.lookup(id).is_none() {
            return;
        }
        let nick = nick
            .filter(|nick| !nick.is_empty())
            .unwrap_or_else(|| DEFAULT_NICK.to_owned());
        state.registry.set_profile(id, nick.clone(), room_id.clone());
        info!(%id, room_id, nick, "joined room");

        // The joiner alone gets the backlog, then the whole room, joiner
        // included, hears about the arrival.
        let history = state.rooms.history(&room_id).to_vec();
        broadcast::send_to(&state.registry, id, ServerEvent::RoomHistory(history));
        broadcast::to_room(&state.registry, &room_id, ServerEvent::UserJoined { id, nick });
    }

    pub async fn message(&self, id: ConnectionId, text: String) {
        let state = &mut *self.state.lock().await;
        let Some(conn) = state.registry.lookup(id) else {
            return;
        };
        let Some(room_id) = conn.room.clone() else {
            debug!(%id, "message from roomless connection dropped");
            return;
        };
        let message = Message::new(id, conn.nick().to_owned(), text);
        state.rooms.append(&room_id, message.clone());
        broadcast::to_room(&state.registry, &room_id, ServerEvent::NewMessage(message));
    }

    pub async fn typing(&self, id: ConnectionId, is_typing: bool) {
        let state = self.state.lock().await;
        let Some(conn) = state.registry.lookup(id) else {
            return;
        };
        let Some(room_id) = conn.room.as_deref() else {
            debug!(%id, "typing from roomless connection dropped");
            return;
        };
        let event = ServerEvent::Typing {
            id,
            nick: conn.nick().to_owned(),
            typing: is_typing,
        };
        broadcast::to_others(&state.registry, room_id, id, event);
    }

    pub async fn signal(&self, id: ConnectionId, kind: SignalKind, payload: Value) {
        let state = self.state.lock().await;
        signaling::relay(&state.registry, kind, id, payload);
    }

    /// Terminal. History is left untouched; only the registry entry goes.
    pub async fn disconnect(&self, id: ConnectionId) {
        let state = &mut *self.state.lock().await;
        let Some(conn) = state.registry.unregister(id) else {
            return;
        };
        info!(%id, "connection closed");
        if let Some(room_id) = conn.room.as_deref() {
            let event = ServerEvent::UserLeft {
                id,
                nick: conn.nick().to_owned(),
            };
            broadcast::to_others(&state.registry, room_id, id, event);
        }
    }
}
