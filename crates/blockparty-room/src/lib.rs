//! Multiplayer room coordination for Blockparty.
//!
//! Each room is a pure [`Room`] state machine wrapped in an actor that runs
//! on its own Tokio task.
//!
//! # Key types
//!
//! - [`Room`]: registry, session flags, and the garbage rule
//! - [`RoomManager`]: creates/destroys rooms by name
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomConfig`]: start threshold, capacity, channel size

mod actor;
mod config;
mod error;
mod manager;
mod room;
mod usernames;

pub use actor::{PlayerSender, RoomHandle, RoomInfo};
pub use config::{RoomConfig, SessionFlags};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{Outbound, Room};
pub use usernames::generate_username;
