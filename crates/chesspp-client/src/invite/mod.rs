//! Challenge negotiation.
//!
//! At most one challenge is active at a time, in either direction. An
//! incoming challenge runs a visible countdown and auto-declines when it
//! reaches zero; a newer challenge replaces the current one outright.

mod coordinator;
mod types;

pub use coordinator::InviteCoordinator;
pub use types::{eligible, Invite, InviteState};
