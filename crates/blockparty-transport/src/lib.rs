//! Transport layer for Blockparty.
//!
//! Defines the [`Transport`] and [`Connection`] traits that the server
//! is written against, plus a WebSocket implementation (feature
//! `websocket`, on by default). Everything above this crate deals in
//! whole messages as byte slices and never sees a frame.

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;

/// A unique identifier for a single network connection.
///
/// Assigned by the transport on accept, never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts incoming connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client and completes its handshake.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// The address the transport is listening on. Useful after binding
    /// port 0.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// One bidirectional, message-oriented connection.
///
/// `send` and `recv` take `&self` and may run concurrently from different
/// tasks: a writer pushing room broadcasts while a reader waits for the
/// next client message.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one whole message.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives one whole message. `Ok(None)` means the peer closed the
    /// connection cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    /// The request path the client connected to, e.g. `/party/abc`.
    fn path(&self) -> &str;
}
