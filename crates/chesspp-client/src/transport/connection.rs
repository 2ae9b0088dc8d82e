//! Background websocket task with bounded auto-reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use chesspp_config::TransportConfig;

use crate::protocol::Frame;

use super::types::{Outbound, SessionStatus};

/// Background task managing one channel's websocket.
///
/// Runs until the connection is explicitly closed, the session handle is
/// dropped, or the reconnect budget is exhausted. Abnormal closure (socket
/// error, server-side close, failed connect) schedules a reopen after a
/// fixed interval; after `max_reconnect_attempts` consecutive failures the
/// status feed reports `Failed` and the task exits.
pub(crate) async fn connection_loop(
    url: String,
    config: TransportConfig,
    status: watch::Sender<SessionStatus>,
    frames: mpsc::Sender<Frame>,
    mut outbound: mpsc::Receiver<Outbound>,
) {
    let mut retry_count: u32 = 0;

    loop {
        debug!(url = %url, "connecting");

        match tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            tokio_tungstenite::connect_async(&url),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                retry_count = 0;
                status.send_replace(SessionStatus::connected());
                info!(url = %url, "connection established");

                let (mut ws_write, mut ws_read) = ws_stream.split();
                let mut explicit_close = false;

                loop {
                    tokio::select! {
                        cmd = outbound.recv() => match cmd {
                            Some(Outbound::Frame(json)) => {
                                if ws_write.send(WsMessage::Text(json.into())).await.is_err() {
                                    warn!("write failed, dropping connection");
                                    break;
                                }
                            }
                            Some(Outbound::Shutdown { explicit }) => {
                                let _ = ws_write.send(WsMessage::Close(None)).await;
                                explicit_close = explicit;
                                break;
                            }
                            // Session handle dropped; treat as explicit.
                            None => {
                                explicit_close = true;
                                break;
                            }
                        },
                        msg = ws_read.next() => match msg {
                            Some(Ok(WsMessage::Text(text))) => {
                                match serde_json::from_str::<Frame>(&text) {
                                    Ok(frame) => {
                                        // Receiver gone means nobody is
                                        // dispatching anymore; shut down.
                                        if frames.send(frame).await.is_err() {
                                            explicit_close = true;
                                            break;
                                        }
                                    }
                                    Err(e) => {
                                        debug!(error = %e, "dropping malformed frame");
                                    }
                                }
                            }
                            Some(Ok(WsMessage::Close(_))) | None => {
                                info!("server closed connection");
                                break;
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "websocket error");
                                break;
                            }
                            Some(Ok(_)) => {}
                        },
                    }
                }

                if explicit_close {
                    status.send_replace(SessionStatus::disconnected());
                    return;
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "connect failed");
            }
            Err(_elapsed) => {
                warn!(
                    timeout_secs = config.connect_timeout_secs,
                    "connect timed out"
                );
            }
        }

        // Abnormal closure or failed attempt: bounded reconnect with a
        // fixed interval. No automatic attempts remain once the budget is
        // spent; a fresh explicit open starts over.
        retry_count += 1;
        if retry_count > config.max_reconnect_attempts {
            status.send_replace(SessionStatus::failed(config.max_reconnect_attempts));
            return;
        }
        status.send_replace(SessionStatus::reconnecting(retry_count));
        tokio::time::sleep(Duration::from_secs(config.reconnect_delay_secs)).await;
    }
}
