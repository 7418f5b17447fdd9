//! Socket handler — room-scoped event relay between board and viewer pages.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client events → `joinSession` joins a room, anything else is
//!   relayed to the other members of the sender's rooms
//! - Events from room peers → forward to client
//!
//! There is no acknowledgment, presence tracking, or membership query.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → client ID assigned, nothing sent
//! 2. `joinSession` with a room string → added to that broadcast group
//! 3. Close → removed from every joined room

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::Event;
use crate::state::AppState;

const CLIENT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_socket(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_socket(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_socket(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<Event>(CLIENT_CHANNEL_CAPACITY);

    info!(%client_id, "socket: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, client_id, &client_tx, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    state.rooms.leave_all(client_id).await;
    info!(%client_id, "socket: client disconnected");
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Parse and apply one inbound text frame.
///
/// Kept apart from the socket loop so tests can drive dispatch with plain
/// channels.
async fn process_inbound_text(state: &AppState, client_id: Uuid, client_tx: &mpsc::Sender<Event>, text: &str) {
    let event: Event = match serde_json::from_str(text) {
        Ok(ev) => ev,
        Err(e) => {
            warn!(%client_id, error = %e, "socket: invalid inbound event");
            return;
        }
    };

    if event.is_join() {
        match event.join_room() {
            Some(room) => state.rooms.join(room, client_id, client_tx.clone()).await,
            None => warn!(%client_id, data = %event.data, "socket: joinSession without a room string"),
        }
        return;
    }

    relay(state, client_id, event).await;
}

/// Forward a signaling event to the sender's room peers.
async fn relay(state: &AppState, client_id: Uuid, event: Event) {
    let joined = state.rooms.rooms_of(client_id).await;
    let targets: Vec<String> = match &event.room {
        Some(room) if joined.contains(room) => vec![room.clone()],
        Some(room) => {
            warn!(%client_id, room = room.as_str(), event = %event.event, "socket: relay to room not joined");
            return;
        }
        None => joined,
    };

    if targets.is_empty() {
        debug!(%client_id, event = %event.event, "socket: dropping event before joinSession");
        return;
    }

    for room in &targets {
        let outbound = Event::new(event.event.as_str(), event.data.clone()).with_room(room.as_str());
        let delivered = state.rooms.broadcast(room, &outbound, Some(client_id)).await;
        debug!(%client_id, room = room.as_str(), event = %event.event, delivered, "socket: relayed event");
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &Event) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "socket: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|e| {
        warn!(error = %e, event = %event.event, "socket: failed to send event");
    })
}

#[cfg(test)]
#[path = "socket_test.rs"]
mod tests;
