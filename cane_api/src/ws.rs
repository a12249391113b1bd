use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use tracing::debug;

use crate::state::AppState;

pub async fn handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Forwards navigation broadcasts to the socket until either side goes away. A client too slow
/// to keep up is evicted by the hub, which ends the loop like a disconnect.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut listener = state.broadcast_hub.register();
    debug!("Websocket listener {} connected", listener.id());

    loop {
        tokio::select! {
            broadcast = listener.recv() => {
                let Some(text) = broadcast else { break };
                if socket.send(Message::Text(text.to_string().into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Listeners are receive-only
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.broadcast_hub.unregister(listener.id());
    debug!("Websocket listener {} disconnected", listener.id());
}
