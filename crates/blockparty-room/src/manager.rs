//! Room manager: creates, finds, and destroys rooms by name.

use std::collections::HashMap;

use blockparty_engine::ThreadRandom;
use blockparty_protocol::RoomId;

use crate::actor::spawn_room;
use crate::{Room, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Owns a handle to every live room.
///
/// Rooms are created lazily the first time a connection names them and
/// share nothing with each other.
#[derive(Debug)]
pub struct RoomManager {
    config: RoomConfig,
    rooms: HashMap<RoomId, RoomHandle>,
}

impl RoomManager {
    /// A manager whose rooms all use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Returns the room called `room_id`, spawning it if needed.
    pub fn get_or_create(&mut self, room_id: &RoomId) -> RoomHandle {
        if let Some(handle) = self.rooms.get(room_id) {
            return handle.clone();
        }

        let room = Room::new(room_id.clone(), self.config.clone(), ThreadRandom);
        let handle = spawn_room(room);
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::info!(%room_id, "room created");
        handle
    }

    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).cloned()
    }

    pub async fn get_room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.get_info().await
    }

    /// Shuts a room down and forgets it.
    pub async fn destroy_room(&mut self, room_id: &RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
