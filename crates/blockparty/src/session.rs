//! Client-side glue between a local [`Engine`] and the relay.
//!
//! [`PlayerSession`] does no I/O. The caller feeds it decoded
//! [`ServerMessage`]s and local [`Intent`]s, and asks it for the
//! [`ClientMessage`]s to send. When the connection drops, the session
//! degrades to single-player and stays that way.

use std::time::Duration;

use blockparty_engine::{Engine, EngineEvent, Intent, Randomizer, ThreadRandom, gravity_interval};
use blockparty_protocol::{
    ClientMessage, PlayerId, PlayerView, RoomSnapshot, ServerMessage, Snapshot, validate_garbage,
};

/// One player's view of a multiplayer game.
#[derive(Debug)]
pub struct PlayerSession<R: Randomizer = ThreadRandom> {
    engine: Engine<R>,
    player_id: Option<PlayerId>,
    username: Option<String>,
    room: RoomSnapshot,
    linked: bool,
}

impl<R: Randomizer> PlayerSession<R> {
    pub fn new(engine: Engine<R>) -> Self {
        Self {
            engine,
            player_id: None,
            username: None,
            room: RoomSnapshot::default(),
            linked: true,
        }
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    /// Our id, once the relay has sent `Welcome`.
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The latest registry broadcast.
    pub fn room(&self) -> &RoomSnapshot {
        &self.room
    }

    /// Everyone in the latest broadcast except us.
    pub fn opponents(&self) -> impl Iterator<Item = &PlayerView> {
        let me = self.player_id;
        self.room.players.iter().filter(move |p| Some(p.id) != me)
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn is_multiplayer_mode(&self) -> bool {
        self.room.is_multiplayer_mode
    }

    pub fn game_started(&self) -> bool {
        self.room.game_started
    }

    /// How often the caller's timer should feed `Intent::MoveDown`.
    pub fn gravity_interval(&self) -> Duration {
        gravity_interval(self.engine.state().level())
    }

    /// Applies a local input.
    pub fn apply(&mut self, intent: Intent) -> Vec<EngineEvent> {
        self.engine.apply(intent)
    }

    /// Applies one message from the relay.
    ///
    /// `StartGame` and `GarbageLines` only touch the engine when they name
    /// us. Garbage that fails validation is dropped with a warning.
    pub fn handle_server_message(&mut self, msg: ServerMessage) -> Vec<EngineEvent> {
        if !self.linked {
            return Vec::new();
        }

        match msg {
            ServerMessage::Welcome { id, username } => {
                tracing::debug!(player_id = %id, %username, "welcomed by relay");
                self.player_id = Some(id);
                self.username = Some(username);
                Vec::new()
            }
            ServerMessage::RoomState(state) => {
                self.room = state;
                Vec::new()
            }
            ServerMessage::StartGame { players } => {
                if self.is_named(&players) {
                    tracing::info!(players = players.len(), "multiplayer game starting");
                    self.engine.apply(Intent::Start)
                } else {
                    Vec::new()
                }
            }
            ServerMessage::GarbageLines { lines, recipients } => {
                if !self.is_named(&recipients) {
                    return Vec::new();
                }
                if let Err(e) = validate_garbage(&lines) {
                    tracing::warn!(error = %e, "dropping invalid garbage");
                    return Vec::new();
                }
                self.engine.apply(Intent::Garbage(lines))
            }
        }
    }

    /// The periodic snapshot of our engine, or `None` once offline.
    ///
    /// The room ignores our line clears after a `StartGame` until it has
    /// seen the new game's opening snapshot, so send one right away.
    pub fn outgoing_snapshot(&self) -> Option<ClientMessage> {
        self.linked
            .then(|| ClientMessage::Snapshot(Snapshot::from(self.engine.state())))
    }

    pub fn join_request(&self) -> Option<ClientMessage> {
        self.linked.then_some(ClientMessage::JoinRequest)
    }

    pub fn start_request(&self) -> Option<ClientMessage> {
        self.linked.then_some(ClientMessage::StartRequest)
    }

    /// Drops to single-player. The local game keeps running.
    pub fn on_transport_lost(&mut self) {
        if !self.linked {
            return;
        }
        tracing::warn!("relay connection lost, continuing offline");
        self.linked = false;
        self.room = RoomSnapshot::default();
    }

    fn is_named(&self, ids: &[PlayerId]) -> bool {
        self.player_id.is_some_and(|me| ids.contains(&me))
    }
}

impl Default for PlayerSession<ThreadRandom> {
    fn default() -> Self {
        Self::new(Engine::default())
    }
}
