//! Process-wide shared lobby state.
//!
//! Constructed once at startup and passed by `Arc` to every consumer, so a
//! room view can show lobby context without re-subscribing to the lobby
//! channel. Writes come from whichever component currently owns the lobby
//! session; last writer wins.

use tokio::sync::watch;

use crate::chat::ChatMessage;
use crate::protocol::LobbyUser;

/// Shared store of lobby messages and the lobby roster, with
/// change-notification feeds. Lives for the whole process; no teardown.
pub struct SharedCache {
    max_messages: usize,
    messages: watch::Sender<Vec<ChatMessage>>,
    users: watch::Sender<Vec<LobbyUser>>,
}

impl SharedCache {
    pub fn new(max_messages: usize) -> Self {
        let (messages, _) = watch::channel(Vec::new());
        let (users, _) = watch::channel(Vec::new());
        Self {
            max_messages,
            messages,
            users,
        }
    }

    /// Current lobby message history, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    /// Append one lobby message, evicting the oldest at capacity.
    pub fn add_message(&self, msg: ChatMessage) {
        self.messages.send_modify(|messages| {
            if messages.len() >= self.max_messages {
                messages.remove(0);
            }
            messages.push(msg);
        });
    }

    /// Change feed for the message history.
    pub fn subscribe_messages(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    /// Current lobby roster.
    pub fn users(&self) -> Vec<LobbyUser> {
        self.users.borrow().clone()
    }

    /// Replace the lobby roster wholesale.
    pub fn set_users(&self, users: Vec<LobbyUser>) {
        self.users.send_replace(users);
    }

    /// Change feed for the lobby roster.
    pub fn subscribe_users(&self) -> watch::Receiver<Vec<LobbyUser>> {
        self.users.subscribe()
    }
}
