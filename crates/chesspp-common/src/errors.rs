use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the socket layer. All of these are recovered locally by the
/// bounded reconnect loop; none of them crash the process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,

    #[error("connect timed out after {0}s")]
    ConnectTimeout(u64),

    #[error("socket error: {0}")]
    Socket(String),

    #[error("reconnect attempts exhausted after {0} tries")]
    RetriesExhausted(u32),
}

/// A frame that could not be understood. The frame is logged and dropped;
/// the session continues.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("unexpected frame: {0}")]
    UnexpectedFrame(String),
}

/// Domain failures reported by the server, surfaced as user-visible notices.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("username rejected: {0}")]
    UsernameRejected(String),

    #[error("game room not found")]
    RoomNotFound,

    #[error("invite not eligible: {0}")]
    InviteIneligible(String),

    #[error("no active invite")]
    NoActiveInvite,

    #[error("server error: {0}")]
    Server(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
