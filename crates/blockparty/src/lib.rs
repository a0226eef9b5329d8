//! # Blockparty
//!
//! Real-time multiplayer falling-block game: a relay server that groups
//! connections into rooms by request path, mirrors every player's board to
//! the rest of the room, and turns line clears into garbage for opponents.
//!
//! The relay never simulates a game. Each client runs its own
//! [`Engine`](blockparty_engine::Engine), wrapped in a [`PlayerSession`]
//! that translates between engine state and wire messages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockparty::prelude::*;
//!
//! # async fn demo() -> Result<(), BlockpartyError> {
//! let server = BlockpartyServer::builder()
//!     .bind("0.0.0.0:1999")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod session;

pub use error::BlockpartyError;
pub use server::{BlockpartyServer, BlockpartyServerBuilder, DEFAULT_PORT};
pub use session::PlayerSession;

pub use blockparty_engine as engine;
pub use blockparty_protocol as protocol;
pub use blockparty_room as room;
pub use blockparty_transport as transport;

/// Everything needed to run a relay or drive a client.
pub mod prelude {
    pub use crate::{BlockpartyError, BlockpartyServer, BlockpartyServerBuilder, PlayerSession};
    pub use blockparty_engine::{Engine, EngineEvent, GameState, Intent, Randomizer};
    pub use blockparty_protocol::{
        ClientMessage, Codec, JsonCodec, Phase, PlayerId, RoomId, RoomSnapshot, ServerMessage,
        Snapshot,
    };
    pub use blockparty_room::RoomConfig;
}
