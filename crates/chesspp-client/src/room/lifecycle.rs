//! Pure transitions on [`RoomState`]. No I/O here so every rule is
//! testable without a socket.

use crate::protocol::Player;

use super::types::{RoomLifecycle, RoomState};

impl RoomState {
    /// Mark a player ready. Idempotent; a redundant ready frame changes
    /// nothing. A ready while the room sits in `Reset` moves it back to
    /// `Waiting`.
    pub fn apply_ready(&mut self, username: &str) -> bool {
        if self.lifecycle == RoomLifecycle::Reset {
            self.lifecycle = RoomLifecycle::Waiting;
        }
        match self.players.iter_mut().find(|p| p.username == username) {
            Some(player) if !player.ready => {
                player.ready = true;
                true
            }
            _ => false,
        }
    }

    /// Clear a player's ready flag. Idempotent.
    pub fn apply_unready(&mut self, username: &str) -> bool {
        match self.players.iter_mut().find(|p| p.username == username) {
            Some(player) if player.ready => {
                player.ready = false;
                true
            }
            _ => false,
        }
    }

    /// Replace the player list with a server snapshot.
    pub fn apply_player_list(&mut self, players: Vec<Player>) {
        self.players = players;
        if self.lifecycle == RoomLifecycle::Joining {
            self.lifecycle = RoomLifecycle::Waiting;
        }
    }

    /// Whether the local client may request a start right now: host only,
    /// at least two players, everyone ready, game not already underway.
    pub fn can_start(&self) -> bool {
        self.is_host
            && matches!(
                self.lifecycle,
                RoomLifecycle::Waiting | RoomLifecycle::Reset
            )
            && self.players.len() >= 2
            && self.players.iter().all(|p| p.ready)
    }

    /// A reset wipes every ready flag and the countdown; the room waits in
    /// `Reset` until the next ready arrives.
    pub fn apply_reset(&mut self) {
        for player in &mut self.players {
            player.ready = false;
        }
        self.countdown_remaining = None;
        self.lifecycle = RoomLifecycle::Reset;
    }

    /// The server confirmed the start. Ready flags are spent: they carry no
    /// meaning during play and must be re-earned after any reset.
    pub fn apply_started(&mut self) {
        for player in &mut self.players {
            player.ready = false;
        }
        self.countdown_remaining = None;
        self.lifecycle = RoomLifecycle::InProgress;
    }

    /// Whether `username` is the ready-marked local view of the given player.
    pub fn is_ready(&self, username: &str) -> bool {
        self.players
            .iter()
            .any(|p| p.username == username && p.ready)
    }
}
