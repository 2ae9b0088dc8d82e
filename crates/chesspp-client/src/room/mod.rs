//! Game room membership and lifecycle.
//!
//! The router owns everything that happens between "challenge accepted" and
//! "game in progress": joining the room channel, the ready handshake, host
//! privileges (mode changes, starting), the pre-game countdown display, and
//! orderly teardown when the host leaves or the room turns out not to
//! exist. Events for the UI are published on a single feed.

mod lifecycle;
mod router;
mod types;

pub use router::RoomRouter;
pub use types::{ClientEvent, RoomLifecycle, RoomState};
