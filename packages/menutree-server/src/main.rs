//! Menu tree HTTP server.
//!
//! Configuration comes from the process environment only; no `.env` file is read (see
//! [`menutree_server::config`]). `RUST_LOG` controls log verbosity and defaults to `info`.

use menutree_server::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    start_server(config).await
}
