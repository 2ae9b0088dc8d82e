use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use chesspp_common::TransportError;
use chesspp_config::{ServerConfig, TransportConfig};

use crate::protocol::Frame;

use super::types::ConnectionState;
use super::Session;

fn refused_server() -> ServerConfig {
    // Port 1 is never listening in the test environment.
    ServerConfig {
        base_url: "ws://127.0.0.1:1".to_string(),
    }
}

fn fast_transport(max_attempts: u32) -> TransportConfig {
    TransportConfig {
        connect_timeout_secs: 1,
        reconnect_delay_secs: 1,
        max_reconnect_attempts: max_attempts,
    }
}

#[tokio::test]
async fn send_while_disconnected_fails_fast() {
    let (session, _frames) = Session::new(&refused_server(), &fast_transport(3));

    let result = session.send(&Frame::JoinLobby {
        username: "alice".into(),
    });
    assert!(matches!(result, Err(TransportError::NotConnected)));
}

#[tokio::test(start_paused = true)]
async fn reconnect_budget_exhausts_into_failed() {
    let (mut session, _frames) = Session::new(&refused_server(), &fast_transport(3));
    let mut status = session.subscribe_status();

    session.open("lobby");

    let failed = status
        .wait_for(|s| s.state == ConnectionState::Failed)
        .await
        .unwrap();
    assert_eq!(failed.retry_count, 3);

    // The budget is spent; no further automatic attempts.
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert_eq!(session.status().state, ConnectionState::Failed);
}

#[tokio::test(start_paused = true)]
async fn retry_counter_is_visible_while_reconnecting() {
    let (mut session, _frames) = Session::new(&refused_server(), &fast_transport(5));
    let mut status = session.subscribe_status();

    session.open("lobby");

    let reconnecting = *status
        .wait_for(|s| s.state == ConnectionState::Reconnecting)
        .await
        .unwrap();
    assert_eq!(reconnecting.retry_count, 1);

    let later = *status
        .wait_for(|s| s.state == ConnectionState::Reconnecting && s.retry_count >= 2)
        .await
        .unwrap();
    assert!(later.retry_count >= 2);
}

#[tokio::test(start_paused = true)]
async fn explicit_close_cancels_reconnect() {
    let (mut session, _frames) = Session::new(&refused_server(), &fast_transport(5));
    let mut status = session.subscribe_status();

    session.open("lobby");
    status
        .wait_for(|s| s.state == ConnectionState::Reconnecting)
        .await
        .unwrap();

    session.close(true);
    assert_eq!(session.status().state, ConnectionState::Disconnected);

    // The aborted task must not come back with another attempt.
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert_eq!(session.status().state, ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn reopen_after_failure_starts_a_fresh_budget() {
    let (mut session, _frames) = Session::new(&refused_server(), &fast_transport(2));
    let mut status = session.subscribe_status();

    session.open("lobby");
    status
        .wait_for(|s| s.state == ConnectionState::Failed)
        .await
        .unwrap();

    session.open("lobby");
    let reopened = session.status();
    assert_eq!(reopened.state, ConnectionState::Connecting);
    assert_eq!(reopened.retry_count, 0);
}

#[tokio::test]
async fn loopback_delivers_frames_both_ways() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        ws.send(WsMessage::Text(
            r#"{"type":"connection_established","message":"hello"}"#.into(),
        ))
        .await
        .unwrap();

        // Echo back the first text frame the client sends.
        while let Some(Ok(msg)) = ws.next().await {
            if let WsMessage::Text(text) = msg {
                return text.to_string();
            }
        }
        String::new()
    });

    let config = ServerConfig {
        base_url: format!("ws://{addr}"),
    };
    let (mut session, mut frames) = Session::new(&config, &fast_transport(3));
    let mut status = session.subscribe_status();

    session.open("lobby");
    status
        .wait_for(|s| s.state == ConnectionState::Connected)
        .await
        .unwrap();

    let frame = frames.recv().await.unwrap();
    assert_eq!(
        frame,
        Frame::ConnectionEstablished {
            message: "hello".into(),
        }
    );

    session
        .send(&Frame::JoinLobby {
            username: "alice".into(),
        })
        .unwrap();

    let received = server.await.unwrap();
    let parsed: Frame = serde_json::from_str(&received).unwrap();
    assert_eq!(
        parsed,
        Frame::JoinLobby {
            username: "alice".into(),
        }
    );
}

#[tokio::test]
async fn server_drop_triggers_reconnecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        // Hold the socket open until the client has observably connected
        // and sent a frame, then drop it without a close handshake.
        let _ = ws.next().await;
    });

    let config = ServerConfig {
        base_url: format!("ws://{addr}"),
    };
    let (mut session, _frames) = Session::new(&config, &fast_transport(3));
    let mut status = session.subscribe_status();

    session.open("lobby");
    status
        .wait_for(|s| s.state == ConnectionState::Connected)
        .await
        .unwrap();

    session
        .send(&Frame::JoinLobby {
            username: "alice".into(),
        })
        .unwrap();
    server.await.unwrap();

    let reconnecting = *status
        .wait_for(|s| s.state == ConnectionState::Reconnecting)
        .await
        .unwrap();
    assert_eq!(reconnecting.retry_count, 1);
}

#[tokio::test]
async fn malformed_frames_are_dropped_without_killing_the_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(WsMessage::Text("{not json".into())).await.unwrap();
        ws.send(WsMessage::Text(
            r#"{"type":"user_joined","username":"bob"}"#.into(),
        ))
        .await
        .unwrap();
        // Keep the socket open until the client disconnects.
        while ws.next().await.is_some() {}
    });

    let config = ServerConfig {
        base_url: format!("ws://{addr}"),
    };
    let (mut session, mut frames) = Session::new(&config, &fast_transport(3));
    session.open("lobby");

    let frame = frames.recv().await.unwrap();
    assert_eq!(
        frame,
        Frame::UserJoined {
            username: "bob".into(),
        }
    );
}
