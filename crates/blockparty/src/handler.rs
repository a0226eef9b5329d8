//! Per-connection handler: room lookup, outbound writer, inbound routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Derive the room name from the request path and connect to it
//!   2. Spawn a writer that encodes room output onto the socket
//!   3. Loop: decode client messages and forward them to the room

use std::sync::Arc;

use blockparty_protocol::{ClientMessage, Codec, PlayerId, RoomId, ServerMessage};
use blockparty_room::{PlayerSender, RoomError, RoomHandle};
use blockparty_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::BlockpartyError;
use crate::server::ServerState;

/// Drop guard that takes the player out of its room when the handler exits.
///
/// The last player out also tears the room down. `Drop` is synchronous, so
/// the cleanup runs on a spawned task.
struct RoomGuard<C: Codec> {
    player_id: PlayerId,
    room_id: RoomId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for RoomGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let room_id = self.room_id.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            let Some(handle) = rooms.get(&room_id) else {
                return;
            };
            match handle.disconnect(player_id).await {
                Ok(0) => {
                    if let Err(e) = rooms.destroy_room(&room_id).await {
                        tracing::debug!(%room_id, error = %e, "room teardown failed");
                    } else {
                        tracing::info!(%room_id, "room empty, destroyed");
                    }
                }
                Ok(remaining) => {
                    tracing::debug!(%room_id, %player_id, remaining, "player left room");
                }
                Err(e) => {
                    tracing::debug!(%room_id, %player_id, error = %e, "disconnect failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BlockpartyError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    let room_id = RoomId::from_path(conn.path());
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), %room_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();

    let handle = match enter_room(&state, &room_id, player_id, tx).await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(%conn_id, %room_id, error = %e, "connection refused by room");
            let _ = conn.close().await;
            return Err(e.into());
        }
    };
    let _guard = RoomGuard {
        player_id,
        room_id: room_id.clone(),
        state: Arc::clone(&state),
    };
    tracing::info!(%room_id, %player_id, "player connected");

    let writer = tokio::spawn(write_outbound(conn.clone(), rx, Arc::clone(&state)));
    let result = read_inbound(&conn, &handle, player_id, &state).await;
    writer.abort();

    // _guard drops here and the room forgets the player.
    result
}

/// Connects `player_id` to the named room, creating it on first use.
///
/// Lookup and connect happen under one lock so a concurrent teardown can't
/// slip in between. A room that refuses its very first player is torn down
/// again.
pub(crate) async fn enter_room<C: Codec>(
    state: &ServerState<C>,
    room_id: &RoomId,
    player_id: PlayerId,
    sender: PlayerSender,
) -> Result<RoomHandle, RoomError> {
    let mut rooms = state.rooms.lock().await;
    let handle = rooms.get_or_create(room_id);
    match handle.connect(player_id, sender).await {
        Ok(()) => Ok(handle),
        Err(e) => {
            if handle.get_info().await.is_ok_and(|info| info.player_count == 0) {
                if let Err(err) = rooms.destroy_room(room_id).await {
                    tracing::debug!(%room_id, error = %err, "room teardown failed");
                }
            }
            Err(e)
        }
    }
}

/// Forwards everything the room addresses to this player onto the socket.
///
/// Ends when the room drops the sender or the socket stops accepting
/// writes.
async fn write_outbound<C: Codec>(
    conn: WebSocketConnection,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    state: Arc<ServerState<C>>,
) {
    let conn_id = conn.id();
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}

async fn read_inbound<C: Codec>(
    conn: &WebSocketConnection,
    handle: &RoomHandle,
    player_id: PlayerId,
    state: &ServerState<C>,
) -> Result<(), BlockpartyError> {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "ignoring undecodable message");
                continue;
            }
        };

        handle.send_message(player_id, msg).await?;
    }
}
