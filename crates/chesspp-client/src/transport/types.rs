//! Connection state and internal command types for the transport session.

/// Lifecycle of one session's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Failed,
}

/// Connection status plus reconnect telemetry, published on a watch feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: ConnectionState,
    pub retry_count: u32,
}

impl SessionStatus {
    pub(crate) fn disconnected() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            retry_count: 0,
        }
    }

    pub(crate) fn connecting() -> Self {
        Self {
            state: ConnectionState::Connecting,
            retry_count: 0,
        }
    }

    pub(crate) fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            retry_count: 0,
        }
    }

    pub(crate) fn reconnecting(retry_count: u32) -> Self {
        Self {
            state: ConnectionState::Reconnecting,
            retry_count,
        }
    }

    pub(crate) fn failed(retry_count: u32) -> Self {
        Self {
            state: ConnectionState::Failed,
            retry_count,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// Commands sent to the background connection task.
#[derive(Debug)]
pub(crate) enum Outbound {
    /// A serialized frame to write to the socket.
    Frame(String),
    /// Close the socket. `explicit: true` is user-initiated and never
    /// reconnects; `explicit: false` drops the socket and lets the
    /// reconnect machinery take over.
    Shutdown { explicit: bool },
}
