//! Error types for the room layer.

use blockparty_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this id exists in the manager.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room already holds `max_players` connections.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// A connection tried to join a room it is already in.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// A connection tried to leave a room it isn't in.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The room's actor task has stopped and its channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
