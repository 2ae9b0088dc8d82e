use crate::chat::ChatScope;
use crate::invite::Invite;
use crate::protocol::{GameMode, GameOptions, Player};

/// Where the local client stands in the room's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomLifecycle {
    /// Join frame sent, confirmation pending.
    Joining,
    /// In the room, waiting for everyone to ready up.
    Waiting,
    /// Start requested, countdown running.
    Starting,
    /// The game is on.
    InProgress,
    /// The game was reset; ready flags are cleared until someone readies.
    Reset,
}

/// Local view of the room the client is currently in.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    pub game_id: String,
    pub is_host: bool,
    pub players: Vec<Player>,
    pub mode: GameMode,
    pub options: GameOptions,
    pub lifecycle: RoomLifecycle,
    pub countdown_remaining: Option<u64>,
}

impl RoomState {
    pub fn joining(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            is_host: false,
            players: Vec::new(),
            mode: GameMode::Default,
            options: GameOptions::default(),
            lifecycle: RoomLifecycle::Joining,
            countdown_remaining: None,
        }
    }
}

/// Everything the UI needs to hear about, on one ordered feed.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The lobby connection greeted us.
    LobbyJoined { message: String },
    /// The lobby roster changed; read the fresh copy from the cache.
    RosterChanged,
    /// New messages in a chat scope.
    ChatUpdated(ChatScope),
    /// The server accepted a rename of the local user.
    UsernameChanged { old: String, new: String },
    /// The server rejected the local user's name.
    UsernameRejected { error: String },
    /// Someone challenged us; the countdown is running.
    InviteReceived(Invite),
    /// A challenge ended, by answer or by expiry.
    InviteResolved(Invite),
    /// A challenge was accepted; join this room channel next.
    RoomAssigned { game_id: String },
    /// The room channel confirmed our membership.
    RoomJoined { is_host: bool },
    /// The room's player list changed.
    PlayersUpdated(Vec<Player>),
    /// The host changed the game mode.
    ModeChanged {
        mode: GameMode,
        options: GameOptions,
    },
    /// Pre-game countdown tick; zero means the display should clear.
    CountdownTick(u64),
    GameStarted,
    GameReset,
    /// The room is gone; the UI should drop its room view.
    RoomClosed { reason: String },
    /// Navigate back to the lobby.
    ReturnToLobby { reason: String },
}
