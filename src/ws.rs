use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{State, WebSocketUpgrade, ws::WebSocket},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::debug;

use crate::{AppResult, events::ClientEvent, registry::ConnectionId, session::Hub};

#[debug_handler(state = crate::AppState)]
pub async fn relay_ws(State(hub): State<Arc<Hub>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<Hub>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let id = hub.connect(tx).await;

    // Drain this connection's queue onto its socket. A slow or dead peer
    // backs up here, on its own task, and nowhere else.
    let deliver_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(frame) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(frame.into()).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = stream.next().await {
        if let Err(err) = handle_frame(&hub, id, &frame.into_data()).await {
            debug!(%id, err = %err.0, "frame skipped");
        }
    }

    hub.disconnect(id).await;
    deliver_task.abort();
}

// The protocol is lenient: anything that does not parse as a known event is
// skipped, never answered with an error.
async fn handle_frame(hub: &Hub, id: ConnectionId, data: &[u8]) -> AppResult<()> {
    let event = serde_json::from_slice::<ClientEvent>(data)?;
    hub.dispatch(id, event).await;
    Ok(())
}
