//! Server builder and accept loop.

use std::net::SocketAddr;
use std::sync::Arc;

use blockparty_protocol::{Codec, JsonCodec};
use blockparty_room::{RoomConfig, RoomManager};
use blockparty_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::BlockpartyError;
use crate::handler::handle_connection;

/// Port the relay listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 1999;

/// State shared by every connection handler.
pub(crate) struct ServerState<C: Codec> {
    /// Locked while a connection joins or leaves, so a room can't be
    /// destroyed between another player's lookup and connect.
    pub(crate) rooms: Mutex<RoomManager>,
    pub(crate) codec: C,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and builds a [`BlockpartyServer`].
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), blockparty::BlockpartyError> {
/// use blockparty::prelude::*;
///
/// let server = BlockpartyServer::builder()
///     .bind("0.0.0.0:1999")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct BlockpartyServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl BlockpartyServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{DEFAULT_PORT}"),
            room_config: RoomConfig::default(),
        }
    }

    /// Address to listen on, e.g. `"0.0.0.0:1999"`. Defaults to loopback
    /// on [`DEFAULT_PORT`]. Port 0 picks a free port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Settings applied to every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener.
    pub async fn build(self) -> Result<BlockpartyServer, BlockpartyError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomManager::new(self.room_config)),
            codec: JsonCodec,
        });
        Ok(BlockpartyServer { transport, state })
    }
}

impl Default for BlockpartyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound relay, ready to [`run`](BlockpartyServer::run).
pub struct BlockpartyServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl BlockpartyServer {
    pub fn builder() -> BlockpartyServerBuilder {
        BlockpartyServerBuilder::new()
    }
}

impl<C: Codec> BlockpartyServer<C> {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Accepts connections forever, one handler task each.
    ///
    /// A failed accept (a bad handshake, say) is logged and the loop
    /// carries on.
    pub async fn run(mut self) -> Result<(), BlockpartyError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "blockparty relay running"),
            Err(_) => tracing::info!("blockparty relay running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_loopback_on_default_port() {
        let builder = BlockpartyServerBuilder::default();
        assert_eq!(builder.bind_addr, "127.0.0.1:1999");
        assert_eq!(builder.room_config.max_players, RoomConfig::default().max_players);
    }

    #[test]
    fn test_builder_overrides() {
        let config = RoomConfig {
            max_players: 4,
            ..RoomConfig::default()
        };
        let builder = BlockpartyServer::builder()
            .bind("0.0.0.0:4000")
            .room_config(config);
        assert_eq!(builder.bind_addr, "0.0.0.0:4000");
        assert_eq!(builder.room_config.max_players, 4);
    }
}
