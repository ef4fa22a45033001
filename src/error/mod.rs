//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// No signing key is configured.
    #[error("Please connect your wallet to continue")]
    WalletNotConnected,

    /// The RPC endpoint serves a different chain than the one configured.
    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Empty or zero amount input.
    #[error("Enter an amount")]
    AmountRequired,

    /// Amount input that cannot be parsed or is not positive.
    #[error("Please enter a valid amount")]
    InvalidAmount,

    /// Swap amount below the configured minimum.
    #[error("Minimum swap amount is {min} ETH")]
    AmountTooLow { min: String },

    /// Swap amount above the configured maximum.
    #[error("Maximum swap amount is {max} ETH")]
    AmountTooHigh { max: String },

    /// Wallet balance does not cover the amount.
    #[error("Insufficient {asset} balance")]
    InsufficientBalance { asset: String },

    /// Pool does not hold enough tokens for the swap.
    #[error("Insufficient liquidity in the pool")]
    InsufficientLiquidity,

    /// Pre-flight simulation reverted.
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    /// Transaction mined but reverted, or never confirmed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No tracked transaction with this hash.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Transaction state machine rejected an event.
    #[error("Invalid transaction state transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric overflow during conversion.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),

    /// Pending transaction error.
    #[error("Pending transaction error: {0}")]
    PendingTransaction(String),
}

impl AppError {
    /// Whether the error stems from user input rather than the chain or the node.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidAddress(_)
                | AppError::AmountRequired
                | AppError::InvalidAmount
                | AppError::AmountTooLow { .. }
                | AppError::AmountTooHigh { .. }
                | AppError::InsufficientBalance { .. }
                | AppError::InsufficientLiquidity
                | AppError::TransactionNotFound(_)
                | AppError::InvalidTransition { .. }
                | AppError::Parse(_)
                | AppError::NumericOverflow(_)
        )
    }
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::Rpc(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for AppError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        AppError::PendingTransaction(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            _ if err.is_user_error() => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) | AppError::WalletNotConnected | AppError::WrongNetwork { .. } => {
                McpError::invalid_request(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
