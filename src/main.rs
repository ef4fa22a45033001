//! FluffySwap MCP Server
//!
//! A Model Context Protocol server for the FluffySwap ETH/FLUF exchange.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fluffyswap_mcp::{Config, FluffySwapServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(rpc_url = %config.rpc_url, chain_id = config.chain_id, "Starting FluffySwap MCP Server");

    let server = FluffySwapServer::new(config)?;
    let watcher = server.spawn_market_watcher();

    // Run with stdio transport
    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    running.waiting().await?;

    if let Some(handle) = watcher {
        handle.abort();
    }
    tracing::info!("FluffySwap MCP Server stopped");

    Ok(())
}
