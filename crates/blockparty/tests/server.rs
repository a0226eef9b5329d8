//! Integration tests for the Blockparty relay, handler, and full match flow.

use std::time::Duration;

use blockparty::prelude::*;
use blockparty_engine::{BOARD_HEIGHT, Block, PieceKind, ScriptedRandom};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

type ClientWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

// =========================================================================
// Helpers
// =========================================================================

/// Starts a relay on a random port and returns its address.
async fn start_server() -> String {
    start_server_with(RoomConfig::default()).await
}

async fn start_server_with(config: RoomConfig) -> String {
    let server = BlockpartyServer::builder()
        .bind("127.0.0.1:0")
        .room_config(config)
        .build()
        .await
        .expect("server should bind");
    let addr = server.local_addr().expect("bound address");
    tokio::spawn(server.run());
    addr.to_string()
}

async fn connect(addr: &str, path: &str) -> ClientWs {
    let url = format!("ws://{addr}{path}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("client should connect");
    ws
}

async fn send(ws: &mut ClientWs, msg: &ClientMessage) {
    let text = serde_json::to_string(msg).expect("encode");
    ws.send(Message::Text(text.into())).await.expect("send");
}

async fn recv(ws: &mut ClientWs) -> ServerMessage {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for relay")
            .expect("stream ended")
            .expect("websocket error");
        if msg.is_text() || msg.is_binary() {
            return serde_json::from_slice(&msg.into_data()).expect("decode");
        }
    }
}

/// Reads the welcome and the first broadcast, returning our id.
async fn welcome(ws: &mut ClientWs) -> PlayerId {
    let id = match recv(ws).await {
        ServerMessage::Welcome { id, .. } => id,
        other => panic!("expected welcome, got {other:?}"),
    };
    next_state(ws).await;
    id
}

async fn next_state(ws: &mut ClientWs) -> RoomSnapshot {
    loop {
        if let ServerMessage::RoomState(state) = recv(ws).await {
            return state;
        }
    }
}

/// Reads broadcasts until one satisfies `pred`.
async fn state_where(ws: &mut ClientWs, pred: impl Fn(&RoomSnapshot) -> bool) -> RoomSnapshot {
    loop {
        let state = next_state(ws).await;
        if pred(&state) {
            return state;
        }
    }
}

fn both_joined(state: &RoomSnapshot) -> bool {
    state.players.len() == 2 && state.players.iter().all(|p| p.status == Phase::Joined)
}

fn lines(n: u32) -> ClientMessage {
    ClientMessage::Snapshot(Snapshot {
        lines: n,
        ..Snapshot::default()
    })
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_receives_welcome_and_registry() {
    let addr = start_server().await;
    let mut ws = connect(&addr, "/").await;

    match recv(&mut ws).await {
        ServerMessage::Welcome { username, .. } => {
            assert!(username.contains('-'), "username was {username}");
        }
        other => panic!("expected welcome, got {other:?}"),
    }
    let state = next_state(&mut ws).await;
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].status, Phase::Online);
    assert!(!state.is_multiplayer_mode);
    assert!(!state.game_started);
}

#[tokio::test]
async fn test_players_on_same_path_share_a_room() {
    let addr = start_server().await;
    let mut a = connect(&addr, "/party/red").await;
    let id_a = welcome(&mut a).await;
    let mut b = connect(&addr, "/party/red").await;
    let id_b = welcome(&mut b).await;

    let state = state_where(&mut a, |s| s.players.len() == 2).await;
    assert!(state.player(id_a).is_some());
    assert!(state.player(id_b).is_some());
}

#[tokio::test]
async fn test_rooms_isolated_by_path() {
    let addr = start_server().await;
    let mut red = connect(&addr, "/red").await;
    welcome(&mut red).await;
    let mut blue = connect(&addr, "/blue").await;
    welcome(&mut blue).await;

    send(&mut red, &ClientMessage::JoinRequest).await;
    let state = next_state(&mut red).await;
    assert!(state.is_multiplayer_mode);
    assert_eq!(state.players.len(), 1);

    let quiet = tokio::time::timeout(Duration::from_millis(200), blue.next()).await;
    assert!(quiet.is_err(), "blue room should hear nothing");
}

#[tokio::test]
async fn test_undecodable_message_is_skipped() {
    let addr = start_server().await;
    let mut ws = connect(&addr, "/").await;
    welcome(&mut ws).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"DANCE"}"#.into())).await.unwrap();
    send(&mut ws, &ClientMessage::JoinRequest).await;

    // The connection survives and the join goes through.
    let state = next_state(&mut ws).await;
    assert!(state.is_multiplayer_mode);
    assert_eq!(state.players[0].status, Phase::Joined);
}

#[tokio::test]
async fn test_match_sends_garbage_to_opponent_only() {
    let addr = start_server().await;
    let mut a = connect(&addr, "/match").await;
    let id_a = welcome(&mut a).await;
    let mut b = connect(&addr, "/match").await;

    // B is driven through a PlayerSession.
    let mut session = PlayerSession::new(Engine::new(ScriptedRandom::always(PieceKind::O)));
    session.handle_server_message(recv(&mut b).await);
    let id_b = session.player_id().expect("welcomed");

    send(&mut a, &ClientMessage::JoinRequest).await;
    send(&mut b, &session.join_request().unwrap()).await;
    state_where(&mut a, both_joined).await;
    send(&mut a, &ClientMessage::StartRequest).await;

    loop {
        let msg = recv(&mut b).await;
        let started = matches!(&msg, ServerMessage::StartGame { .. });
        session.handle_server_message(msg);
        if started {
            break;
        }
    }
    assert!(session.engine().state().current_piece().is_some());

    // Each side reports its new game before any clears count.
    send(&mut b, &session.outgoing_snapshot().unwrap()).await;
    send(&mut a, &lines(0)).await;
    send(&mut a, &lines(2)).await;

    loop {
        let msg = recv(&mut b).await;
        let garbage = match &msg {
            ServerMessage::GarbageLines { recipients, .. } => {
                assert_eq!(recipients, &vec![id_b]);
                true
            }
            _ => false,
        };
        session.handle_server_message(msg);
        if garbage {
            break;
        }
    }
    let rows = session.engine().state().board().rows();
    for row in &rows[BOARD_HEIGHT - 2..] {
        assert_eq!(row.iter().filter(|c| **c == Some(Block::Garbage)).count(), 9);
    }

    // A sees its own update but never garbage.
    loop {
        match recv(&mut a).await {
            ServerMessage::GarbageLines { .. } => panic!("sender must not get garbage"),
            ServerMessage::RoomState(state)
                if state.player(id_a).is_some_and(|p| p.lines == 2) =>
            {
                assert!(state.game_started);
                break;
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_opponent_disconnect_resets_session() {
    let addr = start_server().await;
    let mut a = connect(&addr, "/duel").await;
    welcome(&mut a).await;
    let mut b = connect(&addr, "/duel").await;
    welcome(&mut b).await;

    send(&mut a, &ClientMessage::JoinRequest).await;
    send(&mut b, &ClientMessage::JoinRequest).await;
    state_where(&mut a, both_joined).await;
    send(&mut a, &ClientMessage::StartRequest).await;
    state_where(&mut a, |s| s.game_started).await;

    b.close(None).await.unwrap();

    let state = state_where(&mut a, |s| s.players.len() == 1).await;
    assert!(!state.is_multiplayer_mode);
    assert!(!state.game_started);
    assert_eq!(state.players[0].status, Phase::Online);
}

#[tokio::test]
async fn test_emptied_room_starts_fresh() {
    let addr = start_server().await;
    let mut a = connect(&addr, "/again").await;
    let first = welcome(&mut a).await;
    send(&mut a, &ClientMessage::JoinRequest).await;
    state_where(&mut a, |s| s.is_multiplayer_mode).await;
    a.close(None).await.unwrap();
    drop(a);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut b = connect(&addr, "/again").await;
    let second = match recv(&mut b).await {
        ServerMessage::Welcome { id, .. } => id,
        other => panic!("expected welcome, got {other:?}"),
    };
    assert_ne!(first, second);
    let state = next_state(&mut b).await;
    assert_eq!(state.players.len(), 1);
    assert!(!state.is_multiplayer_mode);
}

#[tokio::test]
async fn test_full_room_closes_connection() {
    let addr = start_server_with(RoomConfig {
        max_players: 1,
        ..RoomConfig::default()
    })
    .await;
    let mut a = connect(&addr, "/solo").await;
    welcome(&mut a).await;

    let mut b = connect(&addr, "/solo").await;
    let result = tokio::time::timeout(Duration::from_secs(2), b.next()).await;
    match result {
        Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) => {}
        other => panic!("expected close, got {other:?}"),
    }
}
