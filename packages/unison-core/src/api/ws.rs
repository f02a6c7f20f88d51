//! WebSocket handler for the room event channel.
//!
//! Each connection runs a two-phase protocol: the first accepted command must
//! be `join` (everything earlier is dropped), after which the handler pumps
//! commands into the room and fans room broadcasts back out. The room-minus-
//! sender delivery for drag relays happens here: each handler skips outbound
//! messages whose `exclude` marks its own connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::sink::SinkExt;
use futures::stream::{SplitSink, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::api::AppState;
use crate::protocol::{ClientCommand, ConnectionId, RoomId, ServerEvent};
use crate::room::{Room, RoomOutbound, RoomStore};

/// Username used when a join carries no (or a blank) display name.
const ANONYMOUS_USERNAME: &str = "anonymous";

// ─────────────────────────────────────────────────────────────────────────────
// Room Guard (RAII cleanup)
// ─────────────────────────────────────────────────────────────────────────────

/// RAII guard that runs the leave transition when the handler exits.
///
/// Covers every exit path - clean close, transport error, force-close, panic.
/// The leave itself handles owner-departure queue advancement and drag
/// cancellation; the guard additionally discards the room once empty.
struct RoomGuard {
    room: Arc<Room>,
    rooms: Arc<RoomStore>,
    conn: ConnectionId,
}

impl Drop for RoomGuard {
    fn drop(&mut self) {
        self.room.leave(&self.conn);
        self.rooms.delete_if_empty(self.room.id());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handler
// ─────────────────────────────────────────────────────────────────────────────

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Main WebSocket connection handler.
async fn handle_ws(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Register connection for tracking and force-close capability
    let conn_guard = state.ws_manager.register();
    let cancel_token = conn_guard.cancel_token().clone();
    let conn = ConnectionId::new(conn_guard.id());

    log::info!("[WS] New connection established: {}", conn_guard.id());

    // Phase 1: wait for the join command
    let Some((username, room_id)) = wait_for_join(&mut receiver, &cancel_token).await else {
        return;
    };
    state.ws_manager.set_room(conn_guard.id(), room_id.clone());

    let room = state.rooms.get_or_create(&room_id);
    // Subscribe before joining so the joiner sees its own roster broadcast
    let mut room_rx = room.subscribe();
    let snapshot = room.join(conn.clone(), &username);
    let _room_guard = RoomGuard {
        room: Arc::clone(&room),
        rooms: Arc::clone(&state.rooms),
        conn: conn.clone(),
    };

    if send_event(&mut sender, &snapshot).await.is_err() {
        log::warn!("[WS] Failed to send join snapshot, client disconnected");
        return;
    }

    // Phase 2: pump commands in, fan broadcasts out
    loop {
        tokio::select! {
            // Handle force-close request
            _ = cancel_token.cancelled() => {
                log::info!("[WS] Connection force-closed: {}", conn);
                break;
            }
            // Handle incoming commands from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(cmd) => dispatch(&room, &conn, cmd),
                            Err(e) => {
                                // Malformed input never reaches room state
                                log::debug!("[WS] Dropping malformed command from {}: {}", conn, e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        log::info!("[WS] Connection closed: {}", conn);
                        break;
                    }
                    Some(Ok(_)) => {} // binary/ping/pong: nothing to do
                    Some(Err(e)) => {
                        log::warn!("[WS] Transport error on {}: {}", conn, e);
                        break;
                    }
                }
            }
            // Fan room broadcasts out to this client
            outbound = room_rx.recv() => {
                match outbound {
                    Ok(RoomOutbound { exclude, event }) => {
                        if exclude.as_ref() == Some(&conn) {
                            continue;
                        }
                        if send_event(&mut sender, &event).await.is_err() {
                            log::warn!("[WS] Send failed on {}, closing", conn);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Missed broadcasts; the next queue/participants
                        // snapshot restores consistency
                        log::warn!("[WS] {} lagged {} room event(s)", conn, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    // RoomGuard and ConnectionGuard Drop impls handle cleanup
}

/// Reads frames until a parseable `join` command arrives.
///
/// Commands sent before joining are ignored. Returns `None` when the client
/// disconnects (or is force-closed) before joining.
async fn wait_for_join(
    receiver: &mut futures::stream::SplitStream<WebSocket>,
    cancel_token: &tokio_util::sync::CancellationToken,
) -> Option<(String, RoomId)> {
    loop {
        let msg = tokio::select! {
            _ = cancel_token.cancelled() => return None,
            msg = receiver.next() => msg,
        };
        match msg {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(ClientCommand::Join {
                        username,
                        room_code,
                    }) => {
                        let username = username
                            .as_deref()
                            .map(str::trim)
                            .filter(|u| !u.is_empty())
                            .unwrap_or(ANONYMOUS_USERNAME)
                            .to_string();
                        return Some((username, RoomId::resolve(room_code.as_deref())));
                    }
                    Ok(other) => {
                        log::debug!("[WS] Command before join ignored: {:?}", other);
                    }
                    Err(e) => {
                        log::debug!("[WS] Dropping malformed pre-join frame: {}", e);
                    }
                }
            }
            Some(Ok(Message::Close(_))) | None => return None,
            Some(Ok(_)) => {}
            Some(Err(_)) => return None,
        }
    }
}

/// Applies a post-join command to the room.
fn dispatch(room: &Room, conn: &ConnectionId, cmd: ClientCommand) {
    match cmd {
        ClientCommand::Join { .. } => {
            log::debug!("[WS] Duplicate join from {} ignored", conn);
        }
        ClientCommand::Play {
            kind,
            url,
            position_ms,
            display_name,
        } => room.play(conn, kind, url, position_ms, display_name),
        ClientCommand::Pause => room.pause(conn),
        ClientCommand::Seek { position_ms } => room.seek(conn, position_ms),
        ClientCommand::ChatMessage { text, kind } => room.post_chat(conn, &text, kind),
        ClientCommand::QueueRemove { index } => room.queue_remove(conn, index),
        ClientCommand::QueueReorder {
            from_index,
            to_index,
        } => room.queue_reorder(conn, from_index, to_index),
        ClientCommand::QueueDrag {
            from_index,
            hover_index,
        } => room.queue_drag(conn, from_index, hover_index),
        ClientCommand::QueueDragEnd => room.queue_drag_end(conn),
        ClientCommand::TrackEnded => room.track_ended(conn),
    }
}

/// Serializes and sends one event frame.
async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(t) => t,
        Err(e) => {
            log::error!("[WS] Failed to serialize event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text.into())).await
}
