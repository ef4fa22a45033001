//! Ethereum interaction module.
//!
//! Contains the RPC client, wallet connection, contract bindings and the
//! gateway the services use to reach the FluffySwap deployment.

pub mod client;
pub mod constants;
pub mod contracts;
pub mod gateway;
pub mod wallet;

pub use client::{EthereumClient, HttpProvider};
pub use gateway::{ChainGateway, SwapGateway};
pub use wallet::WalletConnection;
