//! End-to-end tests: a real server on an OS-assigned port, driven by
//! tokio-tungstenite clients speaking JSON frames.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pairmatch::prelude::*;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

type ClientWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Starts a server on 127.0.0.1:0 and returns its address.
async fn start_server() -> String {
    let server = PairmatchServer::builder()
        .bind("127.0.0.1:0")
        .shuffle_seed(7)
        .build()
        .await
        .expect("server should bind");
    let addr = server.local_addr().expect("local addr").to_string();
    tokio::spawn(server.run());
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("client should connect");
    ws
}

async fn send(ws: &mut ClientWs, frame: Value) {
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("send");
}

/// Next JSON frame from the server, failing after a second of silence.
async fn next_frame(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
            .await
            .expect("server should answer")
            .expect("stream open")
            .expect("valid message");
        if msg.is_text() || msg.is_binary() {
            return serde_json::from_slice(msg.into_data().as_ref()).expect("json frame");
        }
    }
}

async fn login(ws: &mut ClientWs, ack: u64, id: u64, name: &str) {
    send(
        ws,
        json!({ "ack": ack, "action": { "event": "login", "data": { "id": id, "name": name } } }),
    )
    .await;
    assert_eq!(
        next_frame(ws).await,
        json!({ "type": "ack", "ack": ack, "response": true })
    );
}

/// ana offers game 12 on a 4-card board, rui joins and starts it. ana's
/// inbox is drained up to `gameStarted`; rui's `gameStarted` and startGame
/// ack are still pending.
async fn started_session(addr: &str) -> (ClientWs, ClientWs) {
    let mut ana = connect(addr).await;
    let mut rui = connect(addr).await;
    login(&mut ana, 1, 1, "ana").await;
    login(&mut rui, 1, 2, "rui").await;

    send(
        &mut ana,
        json!({ "ack": 2, "action": { "event": "addGame", "data": { "gameId": 12, "boardSize": 4 } } }),
    )
    .await;
    next_frame(&mut ana).await; // lobbyChanged
    next_frame(&mut ana).await; // ack
    next_frame(&mut rui).await; // lobbyChanged

    send(&mut rui, json!({ "ack": 2, "action": { "event": "joinGame", "data": 12 } })).await;
    next_frame(&mut rui).await; // lobbyChanged
    let joined = next_frame(&mut rui).await;
    assert_eq!(joined["type"], "ack");
    let pairing = joined["response"].clone();
    assert_eq!(pairing["player2"]["name"], "rui");
    assert_eq!(next_frame(&mut ana).await["event"], "lobbyChanged");

    send(
        &mut rui,
        json!({ "ack": 3, "action": { "event": "startGame", "data": pairing } }),
    )
    .await;
    let started = next_frame(&mut ana).await;
    assert_eq!(started["event"], "gameStarted");
    assert_eq!(started["data"]["status"], "running");
    assert_eq!(started["data"]["currentPlayer"], 1);

    (ana, rui)
}

// =========================================================================
// Acknowledgments
// =========================================================================

#[tokio::test]
async fn test_login_then_fetch_games_acked() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;

    login(&mut ana, 1, 1, "ana").await;
    send(&mut ana, json!({ "ack": 2, "action": { "event": "fetchGames" } })).await;

    assert_eq!(
        next_frame(&mut ana).await,
        json!({ "type": "ack", "ack": 2, "response": [] })
    );
}

#[tokio::test]
async fn test_rejected_action_acked_with_error() {
    let addr = start_server().await;
    let mut anon = connect(&addr).await;

    send(&mut anon, json!({ "ack": 9, "action": { "event": "fetchGames" } })).await;

    let frame = next_frame(&mut anon).await;
    assert_eq!(frame["type"], "ack");
    assert_eq!(frame["ack"], 9);
    assert_eq!(frame["response"]["errorCode"], 401);
}

#[tokio::test]
async fn test_invalid_payload_without_ack_gets_error_frame() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;

    ana.send(Message::Text("not json".into())).await.unwrap();

    let frame = next_frame(&mut ana).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["errorCode"], 400);

    // The connection survives a bad frame.
    login(&mut ana, 1, 1, "ana").await;
}

#[tokio::test]
async fn test_unknown_action_with_ack_gets_ack_error() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;

    send(&mut ana, json!({ "ack": 3, "action": { "event": "teleport" } })).await;

    let frame = next_frame(&mut ana).await;
    assert_eq!(frame["type"], "ack");
    assert_eq!(frame["ack"], 3);
    assert_eq!(frame["response"]["errorCode"], 400);
}

// =========================================================================
// Broadcasts
// =========================================================================

#[tokio::test]
async fn test_add_game_broadcasts_lobby_to_other_client() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;
    let mut rui = connect(&addr).await;
    login(&mut ana, 1, 1, "ana").await;
    login(&mut rui, 1, 2, "rui").await;

    send(
        &mut ana,
        json!({ "action": { "event": "addGame", "data": { "gameId": 12, "boardSize": 16 } } }),
    )
    .await;

    let frame = next_frame(&mut rui).await;
    assert_eq!(frame["type"], "event");
    assert_eq!(frame["event"], "lobbyChanged");
    assert_eq!(frame["data"][0]["id"], 12);
    assert_eq!(frame["data"][0]["boardSize"], 16);
    assert_eq!(frame["data"][0]["creator"]["name"], "ana");
}

#[tokio::test]
async fn test_closing_socket_withdraws_offer() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;
    let mut rui = connect(&addr).await;
    login(&mut ana, 1, 1, "ana").await;
    login(&mut rui, 1, 2, "rui").await;
    send(
        &mut ana,
        json!({ "ack": 2, "action": { "event": "addGame", "data": { "gameId": 12, "boardSize": 4 } } }),
    )
    .await;
    next_frame(&mut ana).await;
    next_frame(&mut rui).await;

    ana.close(None).await.unwrap();

    let frame = next_frame(&mut rui).await;
    assert_eq!(frame["event"], "lobbyChanged");
    assert_eq!(frame["data"], json!([]));
}

#[tokio::test]
async fn test_full_session_start_and_quit() {
    let addr = start_server().await;
    let (mut ana, mut rui) = started_session(&addr).await;

    send(&mut ana, json!({ "ack": 4, "action": { "event": "quitGame", "data": 12 } })).await;
    // rui's startGame ack may land anywhere among the broadcasts.
    let mut events = Vec::new();
    for _ in 0..5 {
        let frame = next_frame(&mut rui).await;
        if frame["type"] == "event" {
            events.push(frame["event"].clone());
        }
    }
    assert_eq!(
        events,
        vec![json!("gameStarted"), json!("gameChanged"), json!("gameQuitted"), json!("gameEnded")]
    );
}

#[tokio::test]
async fn test_play_negative_index_acked_invalid_index() {
    let addr = start_server().await;
    let (mut ana, _rui) = started_session(&addr).await;

    send(
        &mut ana,
        json!({ "ack": 4, "action": { "event": "play", "data": { "gameId": 12, "index": -1 } } }),
    )
    .await;

    let frame = next_frame(&mut ana).await;
    assert_eq!(frame["type"], "ack");
    assert_eq!(frame["ack"], 4);
    assert_eq!(frame["response"]["errorCode"], 16);
}

// =========================================================================
// Logout
// =========================================================================

#[tokio::test]
async fn test_logout_with_identity_releases_offers() {
    let addr = start_server().await;
    let mut ana = connect(&addr).await;
    let mut rui = connect(&addr).await;
    login(&mut ana, 1, 1, "ana").await;
    login(&mut rui, 1, 2, "rui").await;
    send(
        &mut ana,
        json!({ "ack": 2, "action": { "event": "addGame", "data": { "gameId": 12, "boardSize": 4 } } }),
    )
    .await;
    next_frame(&mut ana).await; // lobbyChanged
    next_frame(&mut ana).await; // ack
    next_frame(&mut rui).await; // lobbyChanged

    send(
        &mut ana,
        json!({ "ack": 3, "action": { "event": "logout", "data": { "id": 1, "name": "ana" } } }),
    )
    .await;

    assert_eq!(next_frame(&mut ana).await["event"], "lobbyChanged");
    assert_eq!(
        next_frame(&mut ana).await,
        json!({ "type": "ack", "ack": 3, "response": true })
    );
    let frame = next_frame(&mut rui).await;
    assert_eq!(frame["event"], "lobbyChanged");
    assert_eq!(frame["data"], json!([]));

    send(&mut ana, json!({ "ack": 4, "action": { "event": "fetchGames" } })).await;
    assert_eq!(next_frame(&mut ana).await["response"]["errorCode"], 401);
}
