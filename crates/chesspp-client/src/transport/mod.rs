//! Resilient socket session over one channel.
//!
//! A `Session` owns at most one live websocket at a time, reconnects a
//! bounded number of times after abnormal closure, and feeds every inbound
//! frame onto a single ordered stream consumed by the room message router.

mod connection;
mod session;
mod types;

#[cfg(test)]
mod tests;

pub use session::{Session, SessionSender};
pub use types::{ConnectionState, SessionStatus};
