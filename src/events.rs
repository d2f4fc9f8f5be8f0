use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{registry::ConnectionId, rooms::msg::Message};

/// Inbound frames, as `{"event": ..., "data": ...}` envelopes. Signaling
/// payloads stay `Value` end to end; their structure belongs to the peers.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        #[serde(default)]
        nick: Option<String>,
    },
    SendMessage { text: String },
    #[serde(rename_all = "camelCase")]
    Typing { is_typing: bool },
    Offer { payload: Value },
    Answer { payload: Value },
    IceCandidate { payload: Value },
}

/// Outbound frames, same envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    RoomHistory(Vec<Message>),
    UserJoined { id: ConnectionId, nick: String },
    NewMessage(Message),
    Typing { id: ConnectionId, nick: String, typing: bool },
    Offer { payload: Value },
    Answer { payload: Value },
    IceCandidate { payload: Value },
    UserLeft { id: ConnectionId, nick: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn parses_join_room() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join-room","data":{"roomId":"r1","nick":"Alice"}}"#)
                .unwrap();
        let ClientEvent::JoinRoom { room_id, nick } = event else {
            panic!("wrong variant");
        };
        assert_eq!(room_id, "r1");
        assert_eq!(nick.as_deref(), Some("Alice"));
    }

    #[test]
    fn join_room_nick_is_optional() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join-room","data":{"roomId":"r1"}}"#).unwrap();
        let ClientEvent::JoinRoom { nick, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(nick, None);
    }

    #[test]
    fn parses_typing_flag() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"typing","data":{"isTyping":true}}"#).unwrap();
        assert!(matches!(event, ClientEvent::Typing { is_typing: true }));
    }

    #[test]
    fn parses_ice_candidate_payload_as_is() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"ice-candidate","data":{"payload":{"candidate":"xyz","sdpMid":"0"}}}"#,
        )
        .unwrap();
        let ClientEvent::IceCandidate { payload } = event else {
            panic!("wrong variant");
        };
        assert_eq!(payload, json!({"candidate": "xyz", "sdpMid": "0"}));
    }

    #[test]
    fn serializes_user_joined_envelope() {
        let id = Uuid::now_v7();
        let frame = serde_json::to_value(ServerEvent::UserJoined {
            id,
            nick: "Alice".to_owned(),
        })
        .unwrap();
        assert_eq!(
            frame,
            json!({"event": "user-joined", "data": {"id": id, "nick": "Alice"}})
        );
    }

    #[test]
    fn serializes_empty_history_as_array() {
        let frame = serde_json::to_value(ServerEvent::RoomHistory(Vec::new())).unwrap();
        assert_eq!(frame, json!({"event": "room-history", "data": []}));
    }
}
