use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use chesspp_common::{ApplicationError, ClientError};
use chesspp_config::ClientConfig;

use crate::cache::SharedCache;
use crate::chat::{ChatLog, ChatMessage, ChatScope};
use crate::invite::{Invite, InviteCoordinator};
use crate::presence::{PresenceDirectory, RosterChange};
use crate::protocol::{ChallengeReply, Frame, GameMode, GameOptions, UserStatus};
use crate::transport::SessionSender;

use super::types::{ClientEvent, RoomLifecycle, RoomState};

const ROOM_NOT_FOUND: &str = "Game room not found";

/// Routes inbound frames to presence, invites, chat and room state, and
/// turns UI intents into outbound frames.
///
/// All handlers are synchronous; timers (invite expiry, countdown display,
/// host-left grace, error return) run as spawned tasks holding narrow
/// clones of the state they touch, and every timer slot aborts its
/// predecessor so at most one of each is ever pending.
pub struct RoomRouter {
    config: ClientConfig,
    presence: Arc<PresenceDirectory>,
    invites: InviteCoordinator,
    cache: Arc<SharedCache>,
    chat: Arc<Mutex<ChatLog>>,
    lobby: SessionSender,
    room: RwLock<Option<SessionSender>>,
    state: Arc<Mutex<Option<RoomState>>>,
    events: mpsc::UnboundedSender<ClientEvent>,
    countdown_timer: Mutex<Option<JoinHandle<()>>>,
    teardown_timer: Mutex<Option<JoinHandle<()>>>,
}

impl RoomRouter {
    /// Build the router and its event feed. Spawns the invite-expiry
    /// forwarder, so this must run inside a runtime.
    pub fn new(
        config: &ClientConfig,
        presence: Arc<PresenceDirectory>,
        cache: Arc<SharedCache>,
        lobby: SessionSender,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<ClientEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (invites, expired_rx) = InviteCoordinator::new(config.invite.countdown_secs);

        let router = Arc::new(Self {
            config: config.clone(),
            presence,
            invites,
            cache,
            chat: Arc::new(Mutex::new(ChatLog::new(config.chat.max_messages_per_scope))),
            lobby,
            room: RwLock::new(None),
            state: Arc::new(Mutex::new(None)),
            events,
            countdown_timer: Mutex::new(None),
            teardown_timer: Mutex::new(None),
        });
        Self::spawn_expiry_forwarder(&router, expired_rx);
        (router, events_rx)
    }

    fn spawn_expiry_forwarder(router: &Arc<Self>, mut expired_rx: mpsc::Receiver<Invite>) {
        let weak: Weak<Self> = Arc::downgrade(router);
        tokio::spawn(async move {
            while let Some(invite) = expired_rx.recv().await {
                let Some(router) = weak.upgrade() else {
                    return;
                };
                router.on_invite_expired(invite);
            }
        });
    }

    fn on_invite_expired(&self, invite: Invite) {
        info!(challenge_id = %invite.id, "challenge expired unanswered, declining");
        let decline = Frame::ChallengeResponse {
            response: ChallengeReply::Decline,
            username: invite.invitee.clone(),
            challenger: invite.inviter.clone(),
        };
        if let Err(e) = self.lobby.send(&decline) {
            warn!(error = %e, "could not send expiry decline");
        }
        self.presence.set_status(&invite.inviter, UserStatus::Online);
        self.presence.set_status(&invite.invitee, UserStatus::Online);
        self.publish_roster();
        // A fresh snapshot corrects any status drift from the race between
        // the expiry and server-side state.
        let _ = self.refresh_roster();
        self.push_lobby_chat(ChatMessage::system(
            ChatScope::Lobby,
            format!("Challenge from {} expired", invite.inviter),
        ));
        self.emit(ClientEvent::InviteResolved(invite));
    }

    // ---- inbound: lobby channel ----

    pub fn handle_lobby_frame(&self, frame: Frame) {
        match frame {
            Frame::ConnectionEstablished { message } => {
                info!(%message, "lobby connection established");
                self.emit(ClientEvent::LobbyJoined { message });
            }
            Frame::UserList { users } | Frame::LobbyUserList { users } => {
                self.reconcile_roster(users);
            }
            Frame::UserJoined { username } => {
                self.presence.set_status(&username, UserStatus::Online);
                self.publish_roster();
                self.push_lobby_chat(ChatMessage::system(
                    ChatScope::Lobby,
                    format!("{username} joined the lobby"),
                ));
            }
            Frame::UserLeft { username } => {
                self.presence.remove(&username);
                self.publish_roster();
                self.push_lobby_chat(ChatMessage::system(
                    ChatScope::Lobby,
                    format!("{username} left the lobby"),
                ));
            }
            Frame::ChatMessage {
                username,
                content,
                timestamp,
            }
            | Frame::LobbyMessage {
                username,
                content,
                timestamp,
            } => {
                self.push_lobby_chat(ChatMessage::user(
                    ChatScope::Lobby,
                    username,
                    content,
                    timestamp,
                ));
            }
            Frame::UsernameChanged {
                old_username,
                new_username,
            } => {
                if old_username == self.presence.local_user() {
                    self.presence.set_local_user(&new_username);
                }
                self.publish_roster();
                self.push_lobby_chat(ChatMessage::system(
                    ChatScope::Lobby,
                    format!("{old_username} is now known as {new_username}"),
                ));
                self.emit(ClientEvent::UsernameChanged {
                    old: old_username,
                    new: new_username,
                });
            }
            Frame::UsernameError { error, .. } => {
                warn!(%error, "username rejected");
                self.emit(ClientEvent::UsernameRejected { error });
            }
            Frame::GameChallenge {
                challenger,
                opponent,
                challenge_id,
            } => {
                if opponent != self.presence.local_user() {
                    debug!(%opponent, "ignoring challenge aimed at someone else");
                    return;
                }
                if let Some(replaced) = self.invites.receive(&challenger, &opponent, &challenge_id)
                {
                    // The superseded challenge is declined on the wire so
                    // the old challenger is not left hanging.
                    let decline = Frame::ChallengeResponse {
                        response: ChallengeReply::Decline,
                        username: replaced.invitee.clone(),
                        challenger: replaced.inviter.clone(),
                    };
                    if let Err(e) = self.lobby.send(&decline) {
                        warn!(error = %e, "could not decline replaced challenge");
                    }
                    self.presence
                        .set_status(&replaced.inviter, UserStatus::Online);
                }
                // Both sides of a pending challenge show as invited.
                self.presence.set_status(&challenger, UserStatus::Invited);
                self.presence.set_status(&opponent, UserStatus::Invited);
                self.publish_roster();
                if let Some(invite) = self.invites.active() {
                    self.emit(ClientEvent::InviteReceived(invite));
                }
            }
            Frame::ChallengeResponse {
                response,
                username,
                challenger,
            } => {
                if challenger != self.presence.local_user() {
                    return;
                }
                let accepted = response == ChallengeReply::Accept;
                if !accepted {
                    self.presence.set_status(&username, UserStatus::Online);
                    self.presence
                        .set_status(&challenger, UserStatus::Online);
                    self.publish_roster();
                    self.push_lobby_chat(ChatMessage::system(
                        ChatScope::Lobby,
                        format!("{username} declined the challenge"),
                    ));
                }
                if let Some(resolved) = self.invites.resolve_remote(accepted) {
                    self.emit(ClientEvent::InviteResolved(resolved));
                }
            }
            Frame::ChallengeAccepted { username, game_id } => {
                info!(%username, %game_id, "challenge accepted");
                self.invites.clear();
                self.emit(ClientEvent::RoomAssigned { game_id });
            }
            Frame::ChallengeDeclined { username } => {
                self.presence.set_status(&username, UserStatus::Online);
                self.presence
                    .set_status(&self.presence.local_user(), UserStatus::Online);
                self.publish_roster();
                self.push_lobby_chat(ChatMessage::system(
                    ChatScope::Lobby,
                    format!("{username} declined the challenge"),
                ));
                if let Some(resolved) = self.invites.resolve_remote(false) {
                    self.emit(ClientEvent::InviteResolved(resolved));
                }
            }
            Frame::SetStatus { username, status } => {
                self.presence.set_status(&username, status);
                self.publish_roster();
            }
            Frame::Error { message } => {
                warn!(%message, "server error on lobby channel");
                self.push_lobby_chat(ChatMessage::system(ChatScope::Lobby, message));
            }
            Frame::Unknown => {
                debug!("dropping unknown lobby frame");
            }
            other => {
                debug!(frame = ?other, "unexpected frame on lobby channel");
            }
        }
    }

    // ---- inbound: room channel ----

    pub fn handle_room_frame(&self, frame: Frame) {
        match frame {
            Frame::GameRoomJoined { is_inviter } => {
                if let Ok(mut slot) = self.state.lock() {
                    if let Some(room) = slot.as_mut() {
                        room.is_host = is_inviter;
                        if room.lifecycle == RoomLifecycle::Joining {
                            room.lifecycle = RoomLifecycle::Waiting;
                        }
                    }
                }
                self.emit(ClientEvent::RoomJoined { is_host: is_inviter });
            }
            Frame::PlayerList { players } => {
                if let Ok(mut slot) = self.state.lock() {
                    if let Some(room) = slot.as_mut() {
                        room.apply_player_list(players.clone());
                    }
                }
                // Messages from players no longer in the room are dropped;
                // system notices stay.
                if let Ok(mut chat) = self.chat.lock() {
                    chat.retain_room_authors(|author| {
                        players.iter().any(|p| p.username == author)
                    });
                }
                self.emit(ClientEvent::ChatUpdated(ChatScope::Room));
                self.emit(ClientEvent::PlayersUpdated(players));
            }
            Frame::PlayerReady { username, .. } => {
                self.with_room(|room| {
                    room.apply_ready(&username);
                    Some(ClientEvent::PlayersUpdated(room.players.clone()))
                });
            }
            Frame::PlayerUnready { username, .. } => {
                self.with_room(|room| {
                    room.apply_unready(&username);
                    Some(ClientEvent::PlayersUpdated(room.players.clone()))
                });
            }
            Frame::GameModeChanged { mode, options } => {
                // Default mode carries no options; stale ones are dropped.
                let options = match mode {
                    GameMode::Default => GameOptions::default(),
                    GameMode::Custom => options.unwrap_or_default(),
                };
                self.with_room(|room| {
                    room.mode = mode;
                    room.options = options;
                    Some(ClientEvent::ModeChanged { mode, options })
                });
            }
            Frame::GameRoomMessage {
                username,
                content,
                timestamp,
                ..
            } => {
                self.push_room_chat(ChatMessage::user(
                    ChatScope::Room,
                    username,
                    content,
                    timestamp,
                ));
            }
            Frame::GameCountdown => {
                self.start_countdown();
            }
            Frame::GameStarted => {
                self.stop_countdown();
                self.push_room_chat(ChatMessage::system(ChatScope::Room, "Game started"));
                self.with_room(|room| {
                    room.apply_started();
                    Some(ClientEvent::GameStarted)
                });
            }
            Frame::GameReset => {
                self.push_room_chat(ChatMessage::system(ChatScope::Room, "Game reset"));
                self.with_room(|room| {
                    room.apply_reset();
                    Some(ClientEvent::GameReset)
                });
                self.auto_ready_host();
            }
            Frame::HostLeft { username } => {
                self.push_room_chat(ChatMessage::system(
                    ChatScope::Room,
                    format!("Host {username} left the room"),
                ));
                self.schedule_teardown(
                    self.config.room.host_grace_secs,
                    ClientEvent::RoomClosed {
                        reason: format!("host {username} left"),
                    },
                );
            }
            Frame::Error { message } => {
                warn!(%message, "server error on room channel");
                if message == ROOM_NOT_FOUND {
                    self.push_room_chat(ChatMessage::system(ChatScope::Room, message.clone()));
                    self.schedule_teardown(
                        self.config.room.error_return_secs,
                        ClientEvent::ReturnToLobby { reason: message },
                    );
                } else {
                    self.push_room_chat(ChatMessage::system(ChatScope::Room, message));
                }
            }
            Frame::Unknown => {
                debug!("dropping unknown room frame");
            }
            other => {
                debug!(frame = ?other, "unexpected frame on room channel");
            }
        }
    }

    // ---- UI intents ----

    /// Announce ourselves on a freshly opened lobby session.
    pub fn join_lobby(&self) -> Result<(), ClientError> {
        let frame = Frame::JoinLobby {
            username: self.presence.local_user(),
        };
        self.lobby.send(&frame)?;
        Ok(())
    }

    /// Ask the server for a new name.
    pub fn change_username(&self, new_username: &str) -> Result<(), ClientError> {
        let frame = Frame::UsernameChanged {
            old_username: self.presence.local_user(),
            new_username: new_username.to_string(),
        };
        self.lobby.send(&frame)?;
        Ok(())
    }

    /// Re-announce our status. The server answers with a fresh roster
    /// snapshot, which is the closest thing the protocol has to a roster
    /// request.
    pub fn refresh_roster(&self) -> Result<(), ClientError> {
        let username = self.presence.local_user();
        let status = self
            .presence
            .status_of(&username)
            .unwrap_or(UserStatus::Online);
        self.lobby.send(&Frame::SetStatus { username, status })?;
        Ok(())
    }

    /// Challenge another lobby user. Checks both sides' presence before
    /// anything touches the wire.
    pub fn challenge(&self, opponent: &str) -> Result<Invite, ClientError> {
        let local = self.presence.local_user();
        let local_status = self
            .presence
            .status_of(&local)
            .unwrap_or(UserStatus::Online);
        let opponent_status = self
            .presence
            .status_of(opponent)
            .ok_or_else(|| ApplicationError::InviteIneligible(opponent.to_string()))?;

        let invite = self
            .invites
            .issue(&local, opponent, local_status, opponent_status)?;
        self.lobby.send(&Frame::GameChallenge {
            challenger: local.clone(),
            opponent: opponent.to_string(),
            challenge_id: invite.id.clone(),
        })?;

        self.presence.set_status(&local, UserStatus::Invited);
        self.publish_roster();
        let _ = self.lobby.send(&Frame::SetStatus {
            username: local,
            status: UserStatus::Invited,
        });
        Ok(invite)
    }

    /// Answer the active incoming challenge.
    pub fn respond_challenge(&self, accept: bool) -> Result<Invite, ClientError> {
        let invite = self.invites.respond(accept)?;
        let reply = Frame::ChallengeResponse {
            response: if accept {
                ChallengeReply::Accept
            } else {
                ChallengeReply::Decline
            },
            username: invite.invitee.clone(),
            challenger: invite.inviter.clone(),
        };
        self.lobby.send(&reply)?;
        if accept {
            self.presence.set_status(&invite.inviter, UserStatus::Invited);
            self.presence
                .set_status(&invite.invitee, UserStatus::Invited);
        } else {
            self.presence.set_status(&invite.inviter, UserStatus::Online);
            self.presence.set_status(&invite.invitee, UserStatus::Online);
            let _ = self.refresh_roster();
        }
        self.publish_roster();
        self.emit(ClientEvent::InviteResolved(invite.clone()));
        Ok(invite)
    }

    /// Enter a game room on an already-opened room session.
    pub fn join_room(&self, game_id: &str, sender: SessionSender) -> Result<(), ClientError> {
        if let Ok(mut slot) = self.room.write() {
            *slot = Some(sender);
        }
        if let Ok(mut slot) = self.state.lock() {
            *slot = Some(RoomState::joining(game_id));
        }
        self.room_sender()?.send(&Frame::JoinGameRoom {
            username: self.presence.local_user(),
            game_id: game_id.to_string(),
        })?;
        Ok(())
    }

    /// Leave the current room and drop all room-scoped state.
    pub fn leave_room(&self) -> Result<(), ClientError> {
        let game_id = self
            .current_game_id()
            .ok_or(ApplicationError::RoomNotFound)?;
        let frame = Frame::LeaveGameRoom {
            username: self.presence.local_user(),
            game_id,
        };
        let result = self.room_sender()?.send(&frame);
        self.teardown_room();
        result?;
        Ok(())
    }

    /// Flip the local player's ready flag. The server echoes the change to
    /// everyone in the room, ourselves included, so local state follows
    /// the echo rather than the intent.
    pub fn toggle_ready(&self) -> Result<(), ClientError> {
        let username = self.presence.local_user();
        let (game_id, ready) = {
            let slot = self
                .state
                .lock()
                .map_err(|_| ClientError::Other("room state poisoned".into()))?;
            let room = slot.as_ref().ok_or(ApplicationError::RoomNotFound)?;
            (room.game_id.clone(), room.is_ready(&username))
        };
        let frame = if ready {
            Frame::PlayerUnready { username, game_id }
        } else {
            Frame::PlayerReady { username, game_id }
        };
        self.room_sender()?.send(&frame)?;
        Ok(())
    }

    /// Host-only: change the game mode.
    pub fn change_mode(
        &self,
        mode: GameMode,
        options: Option<GameOptions>,
    ) -> Result<(), ClientError> {
        let game_id = {
            let slot = self
                .state
                .lock()
                .map_err(|_| ClientError::Other("room state poisoned".into()))?;
            let room = slot.as_ref().ok_or(ApplicationError::RoomNotFound)?;
            if !room.is_host {
                return Err(ClientError::Other(
                    "only the host can change the game mode".into(),
                ));
            }
            room.game_id.clone()
        };
        let options = match mode {
            GameMode::Default => None,
            GameMode::Custom => options,
        };
        self.room_sender()?.send(&Frame::ChangeGameMode {
            mode,
            options,
            game_id,
        })?;
        Ok(())
    }

    /// Host-only: request the game start. Refused locally unless everyone
    /// is ready.
    pub fn start_game(&self) -> Result<(), ClientError> {
        let game_id = {
            let slot = self
                .state
                .lock()
                .map_err(|_| ClientError::Other("room state poisoned".into()))?;
            let room = slot.as_ref().ok_or(ApplicationError::RoomNotFound)?;
            if !room.can_start() {
                return Err(ClientError::Other(
                    "cannot start: need a full, ready room and host rights".into(),
                ));
            }
            room.game_id.clone()
        };
        self.room_sender()?.send(&Frame::StartGame { game_id })?;
        self.with_room(|room| {
            room.lifecycle = RoomLifecycle::Starting;
            None
        });
        Ok(())
    }

    /// Send a chat message to one scope. Nothing is appended locally; the
    /// server echoes the message back to everyone in the group, us
    /// included, so the echo is the single source of history.
    pub fn send_chat(&self, scope: ChatScope, content: &str) -> Result<(), ClientError> {
        let username = self.presence.local_user();
        let timestamp = crate::chat::now_iso();
        match scope {
            ChatScope::Lobby => {
                self.lobby.send(&Frame::ChatMessage {
                    username,
                    content: content.to_string(),
                    timestamp,
                })?;
            }
            ChatScope::Room => {
                let game_id = self.current_game_id();
                self.room_sender()?.send(&Frame::GameRoomMessage {
                    username,
                    content: content.to_string(),
                    timestamp,
                    game_id,
                })?;
            }
        }
        Ok(())
    }

    // ---- accessors ----

    /// Snapshot of the current room, if we are in one.
    pub fn room_state(&self) -> Option<RoomState> {
        self.state.lock().ok().and_then(|slot| slot.clone())
    }

    /// Chat history for one scope, oldest first.
    pub fn chat_messages(&self, scope: ChatScope) -> Vec<ChatMessage> {
        self.chat
            .lock()
            .map(|chat| chat.all(scope).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The active challenge feed (countdown ticks included).
    pub fn subscribe_invite(&self) -> tokio::sync::watch::Receiver<Option<Invite>> {
        self.invites.subscribe()
    }

    // ---- internals ----

    fn reconcile_roster(&self, users: Vec<crate::protocol::LobbyUser>) {
        let changes = self.presence.reconcile(users);
        for change in &changes {
            let text = match change {
                RosterChange::Joined(name) => format!("{name} joined the lobby"),
                RosterChange::Left(name) => format!("{name} left the lobby"),
            };
            self.push_lobby_chat(ChatMessage::system(ChatScope::Lobby, text));
        }
        self.publish_roster();
    }

    fn publish_roster(&self) {
        self.cache.set_users(self.presence.roster());
        self.emit(ClientEvent::RosterChanged);
    }

    fn push_lobby_chat(&self, msg: ChatMessage) {
        self.cache.add_message(msg.clone());
        if let Ok(mut chat) = self.chat.lock() {
            chat.push(msg);
        }
        self.emit(ClientEvent::ChatUpdated(ChatScope::Lobby));
    }

    fn push_room_chat(&self, msg: ChatMessage) {
        if let Ok(mut chat) = self.chat.lock() {
            chat.push(msg);
        }
        self.emit(ClientEvent::ChatUpdated(ChatScope::Room));
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    fn with_room<F>(&self, f: F)
    where
        F: FnOnce(&mut RoomState) -> Option<ClientEvent>,
    {
        let event = self.state.lock().ok().and_then(|mut slot| {
            let room = slot.as_mut()?;
            f(room)
        });
        if let Some(event) = event {
            self.emit(event);
        }
    }

    fn room_sender(&self) -> Result<SessionSender, ClientError> {
        self.room
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| chesspp_common::TransportError::NotConnected.into())
    }

    fn current_game_id(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|room| room.game_id.clone()))
    }

    /// After a reset the host readies up again automatically, once per
    /// reset frame, so the room never deadlocks waiting on the host.
    fn auto_ready_host(&self) {
        let username = self.presence.local_user();
        let game_id = {
            let Ok(mut slot) = self.state.lock() else {
                return;
            };
            let Some(room) = slot.as_mut() else {
                return;
            };
            if !room.is_host {
                return;
            }
            room.apply_ready(&username);
            room.game_id.clone()
        };
        if let Ok(sender) = self.room_sender() {
            if let Err(e) = sender.send(&Frame::PlayerReady { username, game_id }) {
                warn!(error = %e, "could not send host auto-ready");
            }
        }
    }

    /// Start the pre-game countdown display. Purely cosmetic: the server
    /// decides when the game actually starts, the display just counts to
    /// zero and clears itself without touching the room lifecycle.
    fn start_countdown(&self) {
        let total = self.config.room.countdown_secs;
        self.with_room(|room| {
            room.countdown_remaining = Some(total);
            None
        });
        self.emit(ClientEvent::CountdownTick(total));

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut remaining = total;
            while remaining > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                if let Ok(mut slot) = state.lock() {
                    if let Some(room) = slot.as_mut() {
                        room.countdown_remaining = (remaining > 0).then_some(remaining);
                    }
                }
                let _ = events.send(ClientEvent::CountdownTick(remaining));
            }
        });
        if let Ok(mut slot) = self.countdown_timer.lock() {
            if let Some(old) = slot.replace(task) {
                old.abort();
            }
        }
    }

    fn stop_countdown(&self) {
        if let Ok(mut slot) = self.countdown_timer.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }

    /// Tear the room down after a grace period, unless something (a leave,
    /// another teardown) gets there first.
    fn schedule_teardown(&self, delay_secs: u64, event: ClientEvent) {
        let state = Arc::clone(&self.state);
        let chat = Arc::clone(&self.chat);
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            if let Ok(mut slot) = state.lock() {
                *slot = None;
            }
            if let Ok(mut chat) = chat.lock() {
                chat.clear(ChatScope::Room);
            }
            let _ = events.send(event);
        });
        if let Ok(mut slot) = self.teardown_timer.lock() {
            if let Some(old) = slot.replace(task) {
                old.abort();
            }
        }
    }

    fn teardown_room(&self) {
        self.stop_countdown();
        if let Ok(mut slot) = self.teardown_timer.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
        if let Ok(mut slot) = self.state.lock() {
            *slot = None;
        }
        if let Ok(mut slot) = self.room.write() {
            *slot = None;
        }
        if let Ok(mut chat) = self.chat.lock() {
            chat.clear(ChatScope::Room);
        }
    }
}

impl Drop for RoomRouter {
    fn drop(&mut self) {
        self.stop_countdown();
        if let Ok(mut slot) = self.teardown_timer.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}
