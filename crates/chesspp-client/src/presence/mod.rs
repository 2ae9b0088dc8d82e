//! Lobby roster tracking.
//!
//! The server periodically pushes full roster snapshots; this module
//! reconciles them against the locally-known roster, producing join/leave
//! deltas for the chat feed and preserving locally-set statuses the
//! snapshot has not caught up with yet.

mod directory;
mod types;

pub use directory::PresenceDirectory;
pub use types::RosterChange;
