//! Room configuration and the room-wide session flags.

use serde::{Deserialize, Serialize};

/// Settings applied to every room a manager creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Joined players needed before a start request is honored.
    pub min_players_to_start: usize,

    /// Maximum simultaneous connections per room.
    pub max_players: usize,

    /// Capacity of the room actor's command channel. Senders wait when it
    /// is full.
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players_to_start: 2,
            max_players: 16,
            channel_size: 64,
        }
    }
}

/// The two room-level flags every broadcast carries.
///
/// `game_started` implies `is_multiplayer_mode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub is_multiplayer_mode: bool,
    pub game_started: bool,
}

impl SessionFlags {
    /// Back to single-player defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `true` while a multiplayer match is being played.
    pub fn in_match(&self) -> bool {
        self.is_multiplayer_mode && self.game_started
    }
}
