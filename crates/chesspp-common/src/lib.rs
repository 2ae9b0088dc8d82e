pub mod errors;
pub mod id;

pub use errors::{ApplicationError, ClientError, ConfigError, ProtocolError, TransportError};
pub use id::{new_challenge_id, new_id};

pub type Result<T> = std::result::Result<T, ClientError>;
