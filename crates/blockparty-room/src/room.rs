//! The room coordinator as a plain state machine.
//!
//! [`Room`] owns the player registry and the session flags. Its three
//! transition functions ([`Room::apply_connect`], [`Room::apply_message`],
//! [`Room::apply_disconnect`]) mutate the room and return the messages that
//! should go out, tagged with who receives them. Nothing here touches a
//! socket or a task, so the whole multiplayer flow can be driven from a
//! test.
//!
//! ```text
//! online ──JOIN──▶ joined ──START (≥ min cohort)──▶ playing
//!    ▲                                                 │
//!    └──────── room reset (all over / disconnect) ─────┘
//! ```

use std::collections::BTreeMap;

use blockparty_engine::{BOARD_HEIGHT, BOARD_WIDTH, Randomizer, ThreadRandom};
use blockparty_protocol::{
    ClientMessage, Phase, PlayerId, PlayerView, Recipient, RoomId, RoomSnapshot, ServerMessage,
    Snapshot, garbage_row,
};
use tracing::{debug, info};

use crate::usernames::generate_username;
use crate::{RoomConfig, RoomError, SessionFlags};

/// A message on its way out of the room.
pub type Outbound = (Recipient, ServerMessage);

#[derive(Debug, Clone)]
struct PlayerRecord {
    username: String,
    snapshot: Snapshot,
    phase: Phase,
    /// Set on match start. Cleared by the first snapshot of a fresh game
    /// (`lines == 0`, not over); until then the reports may still be from
    /// the previous game.
    awaiting_fresh_game: bool,
}

impl PlayerRecord {
    fn is_over(&self) -> bool {
        !self.awaiting_fresh_game && self.snapshot.is_game_over
    }
}

/// One room's registry and session state.
#[derive(Debug)]
pub struct Room<R: Randomizer = ThreadRandom> {
    id: RoomId,
    config: RoomConfig,
    players: BTreeMap<PlayerId, PlayerRecord>,
    flags: SessionFlags,
    rng: R,
}

impl<R: Randomizer> Room<R> {
    pub fn new(id: RoomId, config: RoomConfig, rng: R) -> Self {
        Self {
            id,
            config,
            players: BTreeMap::new(),
            flags: SessionFlags::default(),
            rng,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.contains_key(&player_id)
    }

    pub fn phase_of(&self, player_id: PlayerId) -> Option<Phase> {
        self.players.get(&player_id).map(|p| p.phase)
    }

    /// The full registry as broadcast to clients, ordered by player id.
    pub fn view(&self) -> RoomSnapshot {
        RoomSnapshot {
            players: self
                .players
                .iter()
                .map(|(id, record)| PlayerView {
                    id: *id,
                    username: record.username.clone(),
                    board: record.snapshot.board.clone(),
                    score: record.snapshot.score,
                    level: record.snapshot.level,
                    lines: record.snapshot.lines,
                    is_game_over: record.snapshot.is_game_over,
                    status: record.phase,
                })
                .collect(),
            is_multiplayer_mode: self.flags.is_multiplayer_mode,
            game_started: self.flags.game_started,
        }
    }

    // -----------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------

    /// Registers a new connection in the `online` phase.
    ///
    /// The newcomer gets a `Welcome` naming its id and username, then
    /// everyone gets the updated registry.
    ///
    /// # Errors
    /// `AlreadyInRoom` for a duplicate id, `RoomFull` at `max_players`.
    pub fn apply_connect(&mut self, player_id: PlayerId) -> Result<Vec<Outbound>, RoomError> {
        if self.players.contains_key(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.id.clone()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.id.clone()));
        }

        let username = generate_username(&mut self.rng);
        self.players.insert(
            player_id,
            PlayerRecord {
                username: username.clone(),
                snapshot: Snapshot::default(),
                phase: Phase::Online,
                awaiting_fresh_game: false,
            },
        );
        info!(
            room_id = %self.id,
            %player_id,
            %username,
            players = self.players.len(),
            "player connected"
        );

        Ok(vec![
            (
                Recipient::Player(player_id),
                ServerMessage::Welcome {
                    id: player_id,
                    username,
                },
            ),
            self.broadcast(),
        ])
    }

    /// Handles one decoded message from `sender`.
    ///
    /// Messages from ids not in the registry (for instance one that arrived
    /// after its connection was already purged) are ignored.
    pub fn apply_message(&mut self, sender: PlayerId, msg: ClientMessage) -> Vec<Outbound> {
        if !self.players.contains_key(&sender) {
            debug!(room_id = %self.id, %sender, "message from unknown player, ignoring");
            return Vec::new();
        }

        let mut out = match msg {
            ClientMessage::JoinRequest => {
                self.join_multiplayer(sender);
                Vec::new()
            }
            ClientMessage::StartRequest => self.start_multiplayer(sender),
            ClientMessage::Snapshot(snapshot) => self.update_snapshot(sender, snapshot),
        };
        out.push(self.broadcast());
        out
    }

    /// Purges a connection. Unknown ids are a no-op.
    ///
    /// With nobody left, or a lone survivor of a multiplayer session, the
    /// room falls back to single-player defaults.
    pub fn apply_disconnect(&mut self, player_id: PlayerId) -> Vec<Outbound> {
        if self.players.remove(&player_id).is_none() {
            return Vec::new();
        }
        info!(
            room_id = %self.id,
            %player_id,
            players = self.players.len(),
            "player disconnected"
        );

        let remaining = self.players.len();
        if remaining == 0 || (remaining == 1 && self.flags.is_multiplayer_mode) {
            self.reset();
        }
        if remaining == 0 {
            return Vec::new();
        }
        vec![self.broadcast()]
    }

    // -----------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------

    /// Switches the room to multiplayer and promotes every `online`
    /// player to `joined`, clearing their game-over flag.
    fn join_multiplayer(&mut self, sender: PlayerId) {
        self.flags.is_multiplayer_mode = true;
        let mut promoted = 0;
        for record in self.players.values_mut() {
            if record.phase == Phase::Online {
                record.phase = Phase::Joined;
                record.snapshot.is_game_over = false;
                promoted += 1;
            }
        }
        info!(room_id = %self.id, %sender, promoted, "multiplayer joined");
    }

    /// Moves the joined cohort to `playing` if it is large enough and no
    /// match is running.
    fn start_multiplayer(&mut self, sender: PlayerId) -> Vec<Outbound> {
        let cohort: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(_, record)| record.phase == Phase::Joined)
            .map(|(id, _)| *id)
            .collect();

        if self.flags.game_started || cohort.len() < self.config.min_players_to_start {
            debug!(
                room_id = %self.id,
                %sender,
                cohort = cohort.len(),
                game_started = self.flags.game_started,
                "start request rejected"
            );
            return Vec::new();
        }

        self.flags.is_multiplayer_mode = true;
        self.flags.game_started = true;
        for id in &cohort {
            if let Some(record) = self.players.get_mut(id) {
                record.phase = Phase::Playing;
                record.snapshot.is_game_over = false;
                record.awaiting_fresh_game = true;
            }
        }
        info!(room_id = %self.id, %sender, players = cohort.len(), "multiplayer game started");

        vec![(
            Recipient::Group(cohort.clone()),
            ServerMessage::StartGame { players: cohort },
        )]
    }

    /// Stores a snapshot, fires the garbage rule, and checks whether the
    /// match is over.
    fn update_snapshot(&mut self, sender: PlayerId, snapshot: Snapshot) -> Vec<Outbound> {
        let Some(record) = self.players.get_mut(&sender) else {
            return Vec::new();
        };

        let previous_lines = record.snapshot.lines;
        let was_game_over = record.is_over();
        let phase = record.phase;
        let lines = snapshot.lines;
        if record.awaiting_fresh_game && lines == 0 && !snapshot.is_game_over {
            record.awaiting_fresh_game = false;
        }
        let counts = !record.awaiting_fresh_game;
        record.snapshot = snapshot;

        let mut out = Vec::new();
        if phase == Phase::Playing
            && counts
            && !was_game_over
            && self.flags.is_multiplayer_mode
            && lines > previous_lines
        {
            out.extend(self.garbage_for(sender, lines - previous_lines));
        }

        if phase == Phase::Playing && self.every_playing_player_is_over() {
            info!(room_id = %self.id, "all players topped out, match over");
            self.reset();
        }
        out
    }

    /// Builds one garbage batch for `cleared` lines, addressed to every other
    /// player still in the match.
    fn garbage_for(&mut self, sender: PlayerId, cleared: u32) -> Option<Outbound> {
        let recipients: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(id, record)| {
                **id != sender && record.phase == Phase::Playing && !record.is_over()
            })
            .map(|(id, _)| *id)
            .collect();
        if recipients.is_empty() {
            return None;
        }

        let rows = (cleared as usize).min(BOARD_HEIGHT);
        let lines = (0..rows)
            .map(|_| garbage_row(self.rng.pick(BOARD_WIDTH)))
            .collect();
        debug!(
            room_id = %self.id,
            %sender,
            rows,
            recipients = recipients.len(),
            "sending garbage"
        );

        Some((
            Recipient::Group(recipients.clone()),
            ServerMessage::GarbageLines { lines, recipients },
        ))
    }

    fn every_playing_player_is_over(&self) -> bool {
        let mut playing = self
            .players
            .values()
            .filter(|record| record.phase == Phase::Playing)
            .peekable();
        playing.peek().is_some() && playing.all(PlayerRecord::is_over)
    }

    /// Single-player defaults. Joined and playing players go back to
    /// `online` and must join again.
    fn reset(&mut self) {
        self.flags.reset();
        for record in self.players.values_mut() {
            record.phase = Phase::Online;
            record.awaiting_fresh_game = false;
        }
        debug!(room_id = %self.id, "room reset");
    }

    fn broadcast(&self) -> Outbound {
        (Recipient::All, ServerMessage::RoomState(self.view()))
    }
}

// =========================================================================
// Tests
// =========================================================================
