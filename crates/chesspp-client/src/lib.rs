//! Client core for the chesspp realtime lobby and game rooms.
//!
//! The moving parts, bottom up:
//! - [`transport`]: one resilient websocket session per channel, with a
//!   bounded reconnect budget.
//! - [`protocol`]: the JSON frame taxonomy shared with the server.
//! - [`presence`] and [`cache`]: the lobby roster and its shared view.
//! - [`invite`]: challenge negotiation with an auto-decline countdown.
//! - [`room`]: the game-room lifecycle and the event feed for the UI.
//! - [`client`]: the top-level handle that wires it all together.

pub mod cache;
pub mod chat;
pub mod client;
pub mod identity;
pub mod invite;
pub mod presence;
pub mod protocol;
pub mod room;
pub mod transport;

pub use client::ChessClient;
pub use room::{ClientEvent, RoomState};
