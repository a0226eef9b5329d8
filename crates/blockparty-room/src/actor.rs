//! Room actor: runs a [`Room`] inside its own Tokio task.
//!
//! All access goes through a [`RoomHandle`], which sends commands over a
//! bounded mpsc channel. Commands are handled one at a time, to
//! completion, so a message and the broadcast it causes are never
//! interleaved with another connection's message.
//!
//! ```text
//!   handler A ──┐                      ┌──▶ PlayerSender A
//!   handler B ──┼──▶ [mpsc] ──▶ Room ──┼──▶ PlayerSender B
//!   handler C ──┘                      └──▶ PlayerSender C
//! ```

use std::collections::HashMap;

use blockparty_engine::Randomizer;
use blockparty_protocol::{ClientMessage, PlayerId, RoomId, ServerMessage};
use tokio::sync::{mpsc, oneshot};

use crate::room::{Outbound, Room};
use crate::{RoomError, SessionFlags};

/// Channel the room uses to push messages to one connection.
///
/// Unbounded so a slow client never stalls the room; the connection's
/// writer task drains it.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

pub(crate) enum RoomCommand {
    Connect {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Message {
        player_id: PlayerId,
        msg: ClientMessage,
    },
    Disconnect {
        player_id: PlayerId,
        /// Players left after the disconnect.
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// A point-in-time summary of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub player_count: usize,
    pub max_players: usize,
    pub flags: SessionFlags,
}

// ---------------------------------------------------------------------------
// RoomHandle
// ---------------------------------------------------------------------------

/// A cheap, cloneable way to talk to a running room.
///
/// Every method fails with `RoomError::Unavailable` once the actor has
/// stopped.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    /// Adds a connection. On success the room has already queued a
    /// `Welcome` and a broadcast on `sender`.
    pub async fn connect(&self, player_id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Connect {
                player_id,
                sender,
                reply,
            })
            .await
            .map_err(|_| self.unavailable())?;
        rx.await.map_err(|_| self.unavailable())?
    }

    /// Forwards a decoded client message. Fire-and-forget.
    pub async fn send_message(&self, player_id: PlayerId, msg: ClientMessage) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Message { player_id, msg })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Removes a connection and returns how many players remain.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Disconnect { player_id, reply })
            .await
            .map_err(|_| self.unavailable())?;
        rx.await.map_err(|_| self.unavailable())?
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply })
            .await
            .map_err(|_| self.unavailable())?;
        rx.await.map_err(|_| self.unavailable())
    }

    /// Stops the actor after it finishes the commands already queued.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

// ---------------------------------------------------------------------------
// RoomActor
// ---------------------------------------------------------------------------

struct RoomActor<R: Randomizer> {
    room: Room<R>,
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<R: Randomizer> RoomActor<R> {
    async fn run(mut self) {
        let room_id = self.room.id().clone();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Connect {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_connect(player_id, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Message { player_id, msg } => {
                    let out = self.room.apply_message(player_id, msg);
                    self.dispatch(out);
                }
                RoomCommand::Disconnect { player_id, reply } => {
                    let result = self.handle_disconnect(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(%room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn handle_connect(&mut self, player_id: PlayerId, sender: PlayerSender) -> Result<(), RoomError> {
        let out = self.room.apply_connect(player_id)?;
        self.senders.insert(player_id, sender);
        self.dispatch(out);
        Ok(())
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) -> Result<usize, RoomError> {
        if self.senders.remove(&player_id).is_none() {
            return Err(RoomError::NotInRoom(player_id, self.room.id().clone()));
        }
        let out = self.room.apply_disconnect(player_id);
        self.dispatch(out);
        Ok(self.room.player_count())
    }

    /// Delivers each outbound message to every connection its recipient
    /// includes. A closed sender means that connection is already going
    /// away; its message is dropped.
    fn dispatch(&self, out: Vec<Outbound>) {
        for (recipient, msg) in out {
            for (player_id, sender) in &self.senders {
                if recipient.includes(*player_id) {
                    let _ = sender.send(msg.clone());
                }
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room.id().clone(),
            player_count: self.room.player_count(),
            max_players: self.room.config().max_players,
            flags: self.room.flags(),
        }
    }
}

/// Spawns `room` on its own task and returns a handle to it.
pub(crate) fn spawn_room<R>(room: Room<R>) -> RoomHandle
where
    R: Randomizer + 'static,
{
    let (tx, rx) = mpsc::channel(room.config().channel_size.max(1));
    let room_id = room.id().clone();
    let actor = RoomActor {
        room,
        senders: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());
    RoomHandle {
        room_id,
        sender: tx,
    }
}
