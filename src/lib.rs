//! FluffySwap MCP Server Library
//!
//! A Model Context Protocol server that drives the FluffySwap fixed-rate
//! exchange: swap ETH for FLUF and add FLUF liquidity to the pool.
//!
//! # Features
//!
//! - **Quotes**: Token output at the contract's rate, checked against swap
//!   limits, wallet balance and pool liquidity
//! - **Swaps**: Simulated, gas-buffered `swapEthForTokens` submissions
//! - **Liquidity**: Token deposits into the swap contract
//! - **Tracking**: Transaction lifecycle (`pending`, `success`, `error`) with
//!   balance refresh after settlement
//!
//! # Example
//!
//! ```rust,ignore
//! use fluffyswap_mcp::{Config, FluffySwapServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = FluffySwapServer::new(config)?;
//!     server.spawn_market_watcher();
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use mcp::FluffySwapServer;
