//! Wire protocol for Blockparty.
//!
//! This crate defines what clients and the relay say to each other:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Snapshot`],
//!   [`RoomSnapshot`], [`Recipient`], ...): the structures that travel on
//!   the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to and from bytes.
//! - **Garbage** ([`garbage_row`], [`validate_garbage`]): building attack
//!   rows and vetting them on arrival.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! (player registry). It doesn't know about sockets or tasks.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Room (registry, phases)
//! ```

mod codec;
mod error;
mod garbage;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use garbage::{garbage_row, validate_garbage};
pub use types::{
    ClientMessage, Phase, PlayerId, PlayerView, Recipient, RoomId, RoomSnapshot, ServerMessage,
    Snapshot,
};
