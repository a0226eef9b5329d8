//! Core protocol types for Blockparty's wire format.
//!
//! Every type here travels as JSON between a client (a browser, or
//! `blockparty::PlayerSession`) and the relay. Field names are camelCase on
//! the wire.
//!
//! Two messages on each side share one channel without a common tag, so
//! both directions decode through a private "wire" enum and convert into the
//! public tagged variant exactly once, at the boundary.

use std::fmt;

use blockparty_engine::{Board, GameState, Row};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The name of a room, taken from the path the client connected to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Room used when a client connects to `/`.
    pub const LOBBY: &'static str = "lobby";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives a room from a request path such as `/party/abc`.
    ///
    /// Leading and trailing slashes are ignored and the query string is
    /// dropped. An empty path maps to [`RoomId::LOBBY`].
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let name = path.trim_matches('/');
        if name.is_empty() {
            Self::new(Self::LOBBY)
        } else {
            Self::new(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Who should receive an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One player only.
    Player(PlayerId),
    /// Everyone except this player.
    AllExcept(PlayerId),
    /// An explicit list of players.
    Group(Vec<PlayerId>),
}

impl Recipient {
    /// Returns `true` if `player` should receive a message sent to `self`.
    pub fn includes(&self, player: PlayerId) -> bool {
        match self {
            Recipient::All => true,
            Recipient::Player(id) => *id == player,
            Recipient::AllExcept(id) => *id != player,
            Recipient::Group(ids) => ids.contains(&player),
        }
    }
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

/// Where a player stands in the multiplayer flow.
///
/// `Online -> Joined -> Playing -> Online` (on room reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Online,
    Joined,
    Playing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Online => "online",
            Phase::Joined => "joined",
            Phase::Playing => "playing",
        })
    }
}

/// What a client reports about its own game.
///
/// The board carries locked cells only. Extra fields sent by a client are
/// ignored, and a missing `isGameOver` reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    #[serde(default)]
    pub is_game_over: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            score: 0,
            level: 1,
            lines: 0,
            is_game_over: false,
        }
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self {
            board: state.board().clone(),
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            is_game_over: state.is_game_over(),
        }
    }
}

/// One entry of the registry broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub username: String,
    pub board: Board,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub is_game_over: bool,
    pub status: Phase,
}

/// The full registry plus the two room-level flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub players: Vec<PlayerView>,
    pub is_multiplayer_mode: bool,
    pub game_started: bool,
}

impl RoomSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Client -> room
// ---------------------------------------------------------------------------

/// A decoded client message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireClientMessage", into = "WireClientMessage")]
pub enum ClientMessage {
    /// Periodic state report.
    Snapshot(Snapshot),
    /// `{"type":"JOIN_MULTIPLAYER"}`
    JoinRequest,
    /// `{"type":"START_MULTIPLAYER"}`
    StartRequest,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum Control {
    JoinMultiplayer,
    StartMultiplayer,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireClientMessage {
    Control(Control),
    Snapshot(Snapshot),
}

impl From<WireClientMessage> for ClientMessage {
    fn from(wire: WireClientMessage) -> Self {
        match wire {
            WireClientMessage::Control(Control::JoinMultiplayer) => ClientMessage::JoinRequest,
            WireClientMessage::Control(Control::StartMultiplayer) => ClientMessage::StartRequest,
            WireClientMessage::Snapshot(snapshot) => ClientMessage::Snapshot(snapshot),
        }
    }
}

impl From<ClientMessage> for WireClientMessage {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::JoinRequest => WireClientMessage::Control(Control::JoinMultiplayer),
            ClientMessage::StartRequest => WireClientMessage::Control(Control::StartMultiplayer),
            ClientMessage::Snapshot(snapshot) => WireClientMessage::Snapshot(snapshot),
        }
    }
}

// ---------------------------------------------------------------------------
// Room -> client
// ---------------------------------------------------------------------------

/// A message from the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireServerMessage", into = "WireServerMessage")]
pub enum ServerMessage {
    /// Full registry broadcast, sent on every state change.
    RoomState(RoomSnapshot),
    /// Attack rows. Clients not named in `recipients` ignore it.
    GarbageLines {
        lines: Vec<Row>,
        recipients: Vec<PlayerId>,
    },
    /// The joined cohort has been moved to `playing`.
    StartGame { players: Vec<PlayerId> },
    /// Sent once, to a newly connected client only.
    Welcome { id: PlayerId, username: String },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum Event {
    GarbageLines {
        lines: Vec<Row>,
        recipients: Vec<PlayerId>,
    },
    StartGame {
        players: Vec<PlayerId>,
    },
    Welcome {
        id: PlayerId,
        username: String,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireServerMessage {
    Event(Event),
    RoomState(RoomSnapshot),
}

impl From<WireServerMessage> for ServerMessage {
    fn from(wire: WireServerMessage) -> Self {
        match wire {
            WireServerMessage::RoomState(state) => ServerMessage::RoomState(state),
            WireServerMessage::Event(Event::GarbageLines { lines, recipients }) => {
                ServerMessage::GarbageLines { lines, recipients }
            }
            WireServerMessage::Event(Event::StartGame { players }) => {
                ServerMessage::StartGame { players }
            }
            WireServerMessage::Event(Event::Welcome { id, username }) => {
                ServerMessage::Welcome { id, username }
            }
        }
    }
}

impl From<ServerMessage> for WireServerMessage {
    fn from(msg: ServerMessage) -> Self {
        match msg {
            ServerMessage::RoomState(state) => WireServerMessage::RoomState(state),
            ServerMessage::GarbageLines { lines, recipients } => {
                WireServerMessage::Event(Event::GarbageLines { lines, recipients })
            }
            ServerMessage::StartGame { players } => {
                WireServerMessage::Event(Event::StartGame { players })
            }
            ServerMessage::Welcome { id, username } => {
                WireServerMessage::Event(Event::Welcome { id, username })
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
