//! Top-level error type that unifies every crate's errors.

use blockparty_protocol::ProtocolError;
use blockparty_room::RoomError;
use blockparty_transport::TransportError;

/// Any error the server can run into.
///
/// Each variant wraps a crate-specific error; `#[from]` lets `?` convert
/// them automatically.
#[derive(Debug, thiserror::Error)]
pub enum BlockpartyError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Room(#[from] RoomError),
}
