//! Top-level client: owns the sessions, the router, and the pump tasks
//! that feed inbound frames into it.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use chesspp_common::{ClientError, TransportError};
use chesspp_config::ClientConfig;

use crate::cache::SharedCache;
use crate::chat::{ChatMessage, ChatScope};
use crate::identity::IdentityStore;
use crate::invite::Invite;
use crate::presence::PresenceDirectory;
use crate::protocol::{Frame, GameMode, GameOptions, LobbyUser};
use crate::room::{ClientEvent, RoomRouter, RoomState};
use crate::transport::{Session, SessionStatus};

/// The lobby/game client.
///
/// Construct with [`ChessClient::connect`]; it opens the lobby session
/// immediately and re-announces the local user every time the transport
/// (re)connects. Game rooms get their own session, opened per room and
/// closed on leave.
pub struct ChessClient {
    config: ClientConfig,
    identity: Mutex<IdentityStore>,
    cache: Arc<SharedCache>,
    presence: Arc<PresenceDirectory>,
    router: Arc<RoomRouter>,
    lobby: Session,
    room: Option<Session>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChessClient {
    /// Connect using the identity stored at the platform default path.
    pub fn connect(
        config: ClientConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClientEvent>), ClientError> {
        let identity = IdentityStore::open_default()?;
        Self::connect_with_identity(config, identity)
    }

    /// Connect with an explicit identity store. Must run inside a tokio
    /// runtime; the lobby session and its pump start immediately.
    pub fn connect_with_identity(
        config: ClientConfig,
        mut identity: IdentityStore,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClientEvent>), ClientError> {
        let username = match identity.username().map(str::to_string) {
            Some(name) => name,
            None => identity.regenerate_username()?,
        };
        info!(%username, "starting client");

        let cache = Arc::new(SharedCache::new(config.chat.max_messages_per_scope));
        let presence = Arc::new(PresenceDirectory::new(&username));

        let (mut lobby, lobby_frames) = Session::new(&config.server, &config.transport);
        let (router, events_rx) = RoomRouter::new(
            &config,
            Arc::clone(&presence),
            Arc::clone(&cache),
            lobby.sender(),
        );

        lobby.open("lobby");
        let mut tasks = Vec::new();
        tasks.push(spawn_frame_pump(lobby_frames, {
            let router = Arc::clone(&router);
            move |frame| router.handle_lobby_frame(frame)
        }));
        tasks.push(spawn_lobby_greeter(
            lobby.subscribe_status(),
            Arc::clone(&router),
        ));

        Ok((
            Self {
                config,
                identity: Mutex::new(identity),
                cache,
                presence,
                router,
                lobby,
                room: None,
                tasks,
            },
            events_rx,
        ))
    }

    /// Join a game room: opens a dedicated session on the room channel,
    /// waits for it to come up, and announces ourselves. Fails once the
    /// session's reconnect budget is spent.
    pub async fn join_room(&mut self, game_id: &str) -> Result<(), ClientError> {
        self.leave_room_session();

        let (mut session, frames) = Session::new(&self.config.server, &self.config.transport);
        session.open(game_id);

        let mut status = session.subscribe_status();
        let settled = status
            .wait_for(|s| s.is_connected() || s.state == crate::transport::ConnectionState::Failed)
            .await
            .map_err(|_| TransportError::NotConnected)?;
        if !settled.is_connected() {
            return Err(
                TransportError::RetriesExhausted(self.config.transport.max_reconnect_attempts)
                    .into(),
            );
        }

        self.tasks.push(spawn_frame_pump(frames, {
            let router = Arc::clone(&self.router);
            move |frame| router.handle_room_frame(frame)
        }));
        self.router.join_room(game_id, session.sender())?;
        self.room = Some(session);
        Ok(())
    }

    /// Leave the current room and close its session.
    pub fn leave_room(&mut self) -> Result<(), ClientError> {
        let result = self.router.leave_room();
        self.leave_room_session();
        result
    }

    fn leave_room_session(&mut self) {
        if let Some(mut session) = self.room.take() {
            session.close(true);
        }
    }

    /// Disconnect on purpose: remembered so the next start does not offer
    /// to resume.
    pub fn disconnect(&mut self) -> Result<(), ClientError> {
        if let Ok(mut identity) = self.identity.lock() {
            identity.mark_intentional_disconnect()?;
        }
        self.leave_room_session();
        self.lobby.close(true);
        Ok(())
    }

    /// Pick a fresh name after the server rejected ours, persist it, and
    /// rejoin the lobby under it.
    pub fn recover_username(&self) -> Result<String, ClientError> {
        let fresh = self
            .identity
            .lock()
            .map_err(|_| ClientError::Other("identity store poisoned".into()))?
            .regenerate_username()?;
        self.presence.set_local_user(&fresh);
        self.router.join_lobby()?;
        Ok(fresh)
    }

    /// Persist a server-confirmed rename.
    pub fn remember_username(&self, username: &str) -> Result<(), ClientError> {
        self.identity
            .lock()
            .map_err(|_| ClientError::Other("identity store poisoned".into()))?
            .set_username(username)
    }

    /// Whether the previous run ended with a deliberate disconnect. Clears
    /// the flag.
    pub fn take_intentional_disconnect(&self) -> Result<bool, ClientError> {
        self.identity
            .lock()
            .map_err(|_| ClientError::Other("identity store poisoned".into()))?
            .take_intentional_disconnect()
    }

    // ---- delegated intents ----

    pub fn send_chat(&self, scope: ChatScope, content: &str) -> Result<(), ClientError> {
        self.router.send_chat(scope, content)
    }

    pub fn challenge(&self, opponent: &str) -> Result<Invite, ClientError> {
        self.router.challenge(opponent)
    }

    pub fn respond_challenge(&self, accept: bool) -> Result<Invite, ClientError> {
        self.router.respond_challenge(accept)
    }

    pub fn toggle_ready(&self) -> Result<(), ClientError> {
        self.router.toggle_ready()
    }

    pub fn start_game(&self) -> Result<(), ClientError> {
        self.router.start_game()
    }

    pub fn change_mode(
        &self,
        mode: GameMode,
        options: Option<GameOptions>,
    ) -> Result<(), ClientError> {
        self.router.change_mode(mode, options)
    }

    pub fn change_username(&self, new_username: &str) -> Result<(), ClientError> {
        self.router.change_username(new_username)
    }

    pub fn refresh_roster(&self) -> Result<(), ClientError> {
        self.router.refresh_roster()
    }

    // ---- views ----

    pub fn username(&self) -> String {
        self.presence.local_user()
    }

    pub fn room_state(&self) -> Option<RoomState> {
        self.router.room_state()
    }

    pub fn chat_messages(&self, scope: ChatScope) -> Vec<ChatMessage> {
        self.router.chat_messages(scope)
    }

    pub fn lobby_users(&self) -> Vec<LobbyUser> {
        self.cache.users()
    }

    pub fn subscribe_lobby_users(&self) -> watch::Receiver<Vec<LobbyUser>> {
        self.cache.subscribe_users()
    }

    pub fn subscribe_lobby_status(&self) -> watch::Receiver<SessionStatus> {
        self.lobby.subscribe_status()
    }

    pub fn subscribe_invite(&self) -> watch::Receiver<Option<Invite>> {
        self.router.subscribe_invite()
    }
}

impl Drop for ChessClient {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

fn spawn_frame_pump<F>(mut frames: mpsc::Receiver<Frame>, mut handle: F) -> JoinHandle<()>
where
    F: FnMut(Frame) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            handle(frame);
        }
    })
}

/// Re-announces the local user every time the lobby transport connects,
/// covering both the first connect and every reconnect.
fn spawn_lobby_greeter(
    mut status: watch::Receiver<SessionStatus>,
    router: Arc<RoomRouter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if status.changed().await.is_err() {
                return;
            }
            if status.borrow_and_update().is_connected() {
                if let Err(e) = router.join_lobby() {
                    warn!(error = %e, "could not announce in lobby");
                }
            }
        }
    })
}
