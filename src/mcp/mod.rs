//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::FluffySwapServer;
pub use server::{
    AddLiquidityInput, ListTransactionsInput, QuoteSwapInput, SwapEthInput, TransactionHashInput,
};
