//! Wire protocol for the chesspp lobby/game server.
//!
//! Every message is a JSON object with a `"type"` tag. The server relays
//! frames to all members of a room group, so the same taxonomy flows in
//! both directions. Field casing matches the wire exactly: the protocol
//! historically mixes snake_case and camelCase, so the camelCase fields
//! carry explicit renames instead of a blanket rename_all.

use serde::{Deserialize, Serialize};

/// Presence status of a lobby user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    #[default]
    Online,
    Invited,
    Configuring,
    InGame,
}

/// A user as carried in lobby roster snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyUser {
    pub username: String,
    #[serde(default)]
    pub status: UserStatus,
}

impl LobbyUser {
    pub fn new(username: impl Into<String>, status: UserStatus) -> Self {
        Self {
            username: username.into(),
            status,
        }
    }
}

/// A participant in an active game room. Distinct from the lobby roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    #[serde(rename = "isReady", default)]
    pub ready: bool,
    #[serde(rename = "isInviter", default)]
    pub is_inviter: bool,
}

impl Player {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ready: false,
            is_inviter: false,
        }
    }
}

/// Game mode selected by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Default,
    Custom,
}

/// Host-tunable options, only meaningful in custom mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub reveal: bool,
}

/// Accept/decline answer to a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeReply {
    Accept,
    Decline,
}

/// One wire frame. Unknown type tags deserialize to `Unknown` and are
/// dropped by the dispatcher with a log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    ConnectionEstablished {
        message: String,
    },
    JoinLobby {
        username: String,
    },
    LeaveLobby {
        username: String,
    },
    UserList {
        users: Vec<LobbyUser>,
    },
    UserJoined {
        username: String,
    },
    UserLeft {
        username: String,
    },
    ChatMessage {
        username: String,
        content: String,
        timestamp: String,
    },
    UsernameChanged {
        #[serde(rename = "oldUsername")]
        old_username: String,
        #[serde(rename = "newUsername")]
        new_username: String,
    },
    UsernameError {
        error: String,
        #[serde(rename = "oldUsername", default, skip_serializing_if = "Option::is_none")]
        old_username: Option<String>,
    },
    GameChallenge {
        challenger: String,
        opponent: String,
        challenge_id: String,
    },
    ChallengeResponse {
        response: ChallengeReply,
        username: String,
        challenger: String,
    },
    ChallengeAccepted {
        username: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    ChallengeDeclined {
        username: String,
    },
    SetStatus {
        username: String,
        status: UserStatus,
    },
    JoinGameRoom {
        username: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    LeaveGameRoom {
        username: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    PlayerList {
        players: Vec<Player>,
    },
    GameRoomJoined {
        #[serde(rename = "isInviter")]
        is_inviter: bool,
    },
    PlayerReady {
        username: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    PlayerUnready {
        username: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    ChangeGameMode {
        mode: GameMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<GameOptions>,
        #[serde(rename = "gameId")]
        game_id: String,
    },
    GameModeChanged {
        mode: GameMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<GameOptions>,
    },
    GameRoomMessage {
        username: String,
        content: String,
        timestamp: String,
        #[serde(rename = "gameId", default, skip_serializing_if = "Option::is_none")]
        game_id: Option<String>,
    },
    LobbyMessage {
        username: String,
        content: String,
        timestamp: String,
    },
    LobbyUserList {
        users: Vec<LobbyUser>,
    },
    StartGame {
        #[serde(rename = "gameId")]
        game_id: String,
    },
    GameCountdown,
    GameStarted,
    GameReset,
    HostLeft {
        username: String,
    },
    Error {
        message: String,
    },
    #[serde(other)]
    Unknown,
}
