//! Binary entry point: load configuration, initialize logging, run the
//! client until the server closes the connection.
//!
//! Configuration comes from a TOML file passed as the first argument, or
//! from `WORLD_CLIENT_*` environment variables when no file is given.

use tracing::info;
use tracing_subscriber::EnvFilter;

use world_client::{Client, ClientConfig, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env(),
    };
    config.validate_strict()?;

    info!(
        host = %config.server_host,
        port = config.server_port,
        world = %config.world,
        "starting world client"
    );

    let mut client = Client::new(config);
    client.run().await
}
