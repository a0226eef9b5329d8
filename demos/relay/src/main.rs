//! Runnable Blockparty relay.
//!
//! Listens on `BLOCKPARTY_BIND`, defaulting to every interface on
//! [`DEFAULT_PORT`] (the library builder stays on loopback). Clients connect
//! to `ws://host:port/<room>`; `/` is the lobby. Log verbosity follows
//! `RUST_LOG` and defaults to `info`.

use blockparty::DEFAULT_PORT;
use blockparty::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn bind_addr(from_env: Option<String>) -> String {
    from_env
        .filter(|addr| !addr.trim().is_empty())
        .unwrap_or_else(|| format!("0.0.0.0:{DEFAULT_PORT}"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let addr = bind_addr(std::env::var("BLOCKPARTY_BIND").ok());
    tracing::info!(%addr, "starting blockparty relay");

    let server = BlockpartyServer::builder()
        .bind(&addr)
        .room_config(RoomConfig::default())
        .build()
        .await?;

    server.run().await?;
    Ok(())
}
