//! Public handle for one channel's resilient socket session.

use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use chesspp_common::TransportError;
use chesspp_config::{ServerConfig, TransportConfig};

use crate::protocol::Frame;

use super::connection::connection_loop;
use super::types::{Outbound, SessionStatus};

/// One resilient socket channel.
///
/// A session owns at most one live socket: `open` tears down any existing
/// connection before dialing, so reopening never leaves two sockets racing.
/// Inbound frames arrive on the receiver returned by [`Session::new`];
/// connection status (with reconnect telemetry) on a watch feed.
pub struct Session {
    base_url: String,
    config: TransportConfig,
    status_tx: watch::Sender<SessionStatus>,
    frame_tx: mpsc::Sender<Frame>,
    outbound_tx: Arc<RwLock<mpsc::Sender<Outbound>>>,
    task: Option<JoinHandle<()>>,
    channel: Option<String>,
}

impl Session {
    /// Create a session for one server. Returns the session plus the
    /// ordered inbound frame stream; the stream survives reconnects and
    /// reopens.
    pub fn new(
        server: &ServerConfig,
        transport: &TransportConfig,
    ) -> (Self, mpsc::Receiver<Frame>) {
        let (frame_tx, frame_rx) = mpsc::channel(256);
        let (status_tx, _) = watch::channel(SessionStatus::disconnected());
        // Placeholder sender; replaced on every open.
        let (outbound_tx, _) = mpsc::channel(64);

        let session = Self {
            base_url: server.base_url.trim_end_matches('/').to_string(),
            config: transport.clone(),
            status_tx,
            frame_tx,
            outbound_tx: Arc::new(RwLock::new(outbound_tx)),
            task: None,
            channel: None,
        };
        (session, frame_rx)
    }

    fn url_for(&self, channel: &str) -> String {
        format!("{}/ws/game/{channel}/", self.base_url)
    }

    /// Open the socket for a channel, tearing down any existing connection
    /// first. Resets retry telemetry and sets status to `Connecting`.
    pub fn open(&mut self, channel: &str) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.status_tx.send_replace(SessionStatus::connecting());
        self.channel = Some(channel.to_string());

        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        if let Ok(mut slot) = self.outbound_tx.write() {
            *slot = outbound_tx;
        }

        let task = tokio::spawn(connection_loop(
            self.url_for(channel),
            self.config.clone(),
            self.status_tx.clone(),
            self.frame_tx.clone(),
            outbound_rx,
        ));
        self.task = Some(task);
    }

    /// Close the socket. An explicit close (user-initiated) cancels any
    /// in-flight reconnect immediately and never schedules another attempt.
    /// A non-explicit close drops the socket and leaves the reconnect
    /// machinery running, as if the connection had failed.
    pub fn close(&mut self, explicit: bool) {
        if explicit {
            if let Some(task) = self.task.take() {
                task.abort();
            }
            self.status_tx.send_replace(SessionStatus::disconnected());
        } else if let Ok(slot) = self.outbound_tx.read() {
            let _ = slot.try_send(Outbound::Shutdown { explicit: false });
        }
    }

    /// Send a frame. Fails fast when the session is not connected; frames
    /// are never buffered for later delivery.
    pub fn send(&self, frame: &Frame) -> Result<(), TransportError> {
        send_via(&self.status_tx.subscribe(), &self.outbound_tx, frame)
    }

    /// Current status snapshot.
    pub fn status(&self) -> SessionStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to the status feed.
    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// A lightweight cloneable handle that can send frames on this session.
    pub fn sender(&self) -> SessionSender {
        SessionSender {
            status: self.status_tx.subscribe(),
            outbound: Arc::clone(&self.outbound_tx),
        }
    }

    /// The channel this session was last opened on.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Cloneable sending handle onto a session's socket.
#[derive(Clone)]
pub struct SessionSender {
    status: watch::Receiver<SessionStatus>,
    outbound: Arc<RwLock<mpsc::Sender<Outbound>>>,
}

impl SessionSender {
    /// Send a frame, failing fast when not connected.
    pub fn send(&self, frame: &Frame) -> Result<(), TransportError> {
        send_via(&self.status, &self.outbound, frame)
    }

    /// Current status snapshot.
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Ask the connection task to drop the socket without reconnecting.
    pub fn close(&self) {
        if let Ok(slot) = self.outbound.read() {
            let _ = slot.try_send(Outbound::Shutdown { explicit: true });
        }
    }
}

fn send_via(
    status: &watch::Receiver<SessionStatus>,
    outbound: &Arc<RwLock<mpsc::Sender<Outbound>>>,
    frame: &Frame,
) -> Result<(), TransportError> {
    if !status.borrow().is_connected() {
        return Err(TransportError::NotConnected);
    }
    let json = serde_json::to_string(frame).map_err(|e| TransportError::Socket(e.to_string()))?;
    let slot = outbound
        .read()
        .map_err(|_| TransportError::NotConnected)?;
    slot.try_send(Outbound::Frame(json))
        .map_err(|e| TransportError::Socket(e.to_string()))
}
