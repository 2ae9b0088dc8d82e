//! Scoped chat history.
//!
//! Messages live in one of two scopes (lobby, room), each an append-only
//! FIFO list with a bounded ring buffer so memory stays predictable. Which
//! scope is rendered is the active tab's concern, not ours: inbound
//! messages are always appended to their own scope.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Which channel a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatScope {
    Lobby,
    Room,
}

/// User-authored or system-generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    System,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub content: String,
    pub timestamp: String,
    pub scope: ChatScope,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn user(
        scope: ChatScope,
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            timestamp: timestamp.into(),
            scope,
            kind: MessageKind::User,
        }
    }

    pub fn system(scope: ChatScope, content: impl Into<String>) -> Self {
        Self {
            author: "System".to_string(),
            content: content.into(),
            timestamp: now_iso(),
            scope,
            kind: MessageKind::System,
        }
    }
}

/// Current timestamp in the ISO 8601 format the wire uses.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// In-memory chat history for both scopes.
pub struct ChatLog {
    max_per_scope: usize,
    lobby: VecDeque<ChatMessage>,
    room: VecDeque<ChatMessage>,
}

impl ChatLog {
    pub fn new(max_per_scope: usize) -> Self {
        Self {
            max_per_scope,
            lobby: VecDeque::new(),
            room: VecDeque::new(),
        }
    }

    fn buf(&self, scope: ChatScope) -> &VecDeque<ChatMessage> {
        match scope {
            ChatScope::Lobby => &self.lobby,
            ChatScope::Room => &self.room,
        }
    }

    fn buf_mut(&mut self, scope: ChatScope) -> &mut VecDeque<ChatMessage> {
        match scope {
            ChatScope::Lobby => &mut self.lobby,
            ChatScope::Room => &mut self.room,
        }
    }

    /// Append a message to its scope. Oldest messages are evicted when the
    /// buffer is full; arrival order within a scope is preserved.
    pub fn push(&mut self, msg: ChatMessage) {
        let max = self.max_per_scope;
        let buf = self.buf_mut(msg.scope);
        if buf.len() >= max {
            buf.pop_front();
        }
        buf.push_back(msg);
    }

    /// All messages in a scope, oldest first.
    pub fn all(&self, scope: ChatScope) -> Vec<&ChatMessage> {
        self.buf(scope).iter().collect()
    }

    /// The most recent `limit` messages from a scope (oldest first).
    pub fn recent(&self, scope: ChatScope, limit: usize) -> Vec<&ChatMessage> {
        let buf = self.buf(scope);
        let skip = buf.len().saturating_sub(limit);
        buf.iter().skip(skip).collect()
    }

    pub fn len(&self, scope: ChatScope) -> usize {
        self.buf(scope).len()
    }

    pub fn is_empty(&self, scope: ChatScope) -> bool {
        self.buf(scope).is_empty()
    }

    /// Clear one scope's history.
    pub fn clear(&mut self, scope: ChatScope) {
        self.buf_mut(scope).clear();
    }

    /// Drop room messages from authors no longer present, keeping system
    /// notices. Used when a player-list snapshot shrinks the room.
    pub fn retain_room_authors<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.room
            .retain(|m| m.kind == MessageKind::System || keep(&m.author));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(scope: ChatScope, author: &str, content: &str) -> ChatMessage {
        ChatMessage::user(scope, author, content, "2024-01-01T00:00:00Z")
    }

    #[test]
    fn scopes_are_independent() {
        let mut log = ChatLog::new(10);
        log.push(msg(ChatScope::Lobby, "alice", "hi lobby"));
        log.push(msg(ChatScope::Room, "bob", "hi room"));

        assert_eq!(log.len(ChatScope::Lobby), 1);
        assert_eq!(log.len(ChatScope::Room), 1);
        assert_eq!(log.all(ChatScope::Lobby)[0].content, "hi lobby");
        assert_eq!(log.all(ChatScope::Room)[0].content, "hi room");
    }

    #[test]
    fn fifo_order_preserved() {
        let mut log = ChatLog::new(10);
        for i in 0..5 {
            log.push(msg(ChatScope::Lobby, "alice", &format!("m{i}")));
        }
        let contents: Vec<_> = log
            .all(ChatScope::Lobby)
            .iter()
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn oldest_evicted_at_capacity() {
        let mut log = ChatLog::new(3);
        for i in 0..5 {
            log.push(msg(ChatScope::Room, "bob", &format!("m{i}")));
        }
        let contents: Vec<_> = log
            .all(ChatScope::Room)
            .iter()
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn recent_returns_tail() {
        let mut log = ChatLog::new(10);
        for i in 0..5 {
            log.push(msg(ChatScope::Lobby, "alice", &format!("m{i}")));
        }
        let recent: Vec<_> = log
            .recent(ChatScope::Lobby, 2)
            .iter()
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(recent, vec!["m3", "m4"]);
    }

    #[test]
    fn retain_room_authors_keeps_system_messages() {
        let mut log = ChatLog::new(10);
        log.push(msg(ChatScope::Room, "alice", "staying"));
        log.push(msg(ChatScope::Room, "mallory", "leaving"));
        log.push(ChatMessage::system(ChatScope::Room, "mallory left"));

        log.retain_room_authors(|author| author == "alice");

        let authors: Vec<_> = log
            .all(ChatScope::Room)
            .iter()
            .map(|m| m.author.clone())
            .collect();
        assert_eq!(authors, vec!["alice", "System"]);
    }
}
