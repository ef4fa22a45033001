//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::error::AppError;
use crate::ethereum::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_EXPLORER_URL, DEFAULT_FLUFFY_SWAP_ADDRESS, DEFAULT_MAX_SWAP_ETH,
    DEFAULT_MIN_SWAP_ETH, DEFAULT_MY_TOKEN_ADDRESS, DEFAULT_RPC_URL, NATIVE_DECIMALS,
};
use crate::types::{amount::parse_units, SwapLimits};

/// Default balance polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Default quiet window before a requested refresh runs.
pub const DEFAULT_REFRESH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default time to wait for a transaction receipt.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the wallet (hex). `None` runs read-only.
    pub private_key: Option<String>,
    /// Chain the deployment lives on.
    pub chain_id: u64,
    /// FluffySwap contract address.
    pub swap_address: Address,
    /// MyToken contract address.
    pub token_address: Address,
    /// Client-side swap bounds.
    pub swap_limits: SwapLimits,
    /// Balance polling interval.
    pub poll_interval: Duration,
    /// Quiet window for refresh requests.
    pub refresh_debounce: Duration,
    /// Receipt wait timeout.
    pub confirmation_timeout: Duration,
    /// Block explorer base URL.
    pub explorer_url: String,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            private_key: None,
            chain_id: DEFAULT_CHAIN_ID,
            swap_address: DEFAULT_FLUFFY_SWAP_ADDRESS,
            token_address: DEFAULT_MY_TOKEN_ADDRESS,
            swap_limits: SwapLimits::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            refresh_debounce: DEFAULT_REFRESH_DEBOUNCE,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional:
    /// - `ETHEREUM_RPC_URL`: JSON-RPC endpoint (default: public Sepolia RPC)
    /// - `ETHEREUM_PRIVATE_KEY`: signing key; unset or empty runs read-only
    /// - `CHAIN_ID`: expected chain (default: 11155111)
    /// - `FLUFFY_SWAP_ADDRESS`, `MY_TOKEN_ADDRESS`: contract addresses
    /// - `SWAP_MIN_ETH`, `SWAP_MAX_ETH`: swap bounds (default: 0.001 / 10)
    /// - `POLL_INTERVAL_SECS`: balance polling interval (default: 4)
    /// - `REFRESH_DEBOUNCE_MS`: refresh quiet window (default: 300)
    /// - `TX_CONFIRMATION_TIMEOUT_SECS`: receipt wait (default: 120)
    /// - `EXPLORER_URL`: block explorer (default: Sepolia Etherscan)
    /// - `LOG_LEVEL`: logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let swap_address = get("FLUFFY_SWAP_ADDRESS")
            .map(|s| parse_contract_address("FLUFFY_SWAP_ADDRESS", &s))
            .transpose()?
            .unwrap_or(defaults.swap_address);

        let token_address = get("MY_TOKEN_ADDRESS")
            .map(|s| parse_contract_address("MY_TOKEN_ADDRESS", &s))
            .transpose()?
            .unwrap_or(defaults.token_address);

        if swap_address == token_address {
            return Err(AppError::Config(
                "FLUFFY_SWAP_ADDRESS and MY_TOKEN_ADDRESS must differ".into(),
            ));
        }

        let min_eth = get("SWAP_MIN_ETH").unwrap_or_else(|| DEFAULT_MIN_SWAP_ETH.to_string());
        let max_eth = get("SWAP_MAX_ETH").unwrap_or_else(|| DEFAULT_MAX_SWAP_ETH.to_string());
        let swap_limits =
            SwapLimits::new(parse_eth("SWAP_MIN_ETH", &min_eth)?, parse_eth("SWAP_MAX_ETH", &max_eth)?)?;

        let chain_id = get("CHAIN_ID").map(|s| parse_number("CHAIN_ID", &s)).transpose()?;
        let poll_secs = get("POLL_INTERVAL_SECS").map(|s| parse_number("POLL_INTERVAL_SECS", &s)).transpose()?;
        let debounce_ms =
            get("REFRESH_DEBOUNCE_MS").map(|s| parse_number("REFRESH_DEBOUNCE_MS", &s)).transpose()?;
        let timeout_secs = get("TX_CONFIRMATION_TIMEOUT_SECS")
            .map(|s| parse_number("TX_CONFIRMATION_TIMEOUT_SECS", &s))
            .transpose()?;

        if poll_secs == Some(0) {
            return Err(AppError::Config("POLL_INTERVAL_SECS must be at least 1".into()));
        }

        Ok(Self {
            rpc_url: get("ETHEREUM_RPC_URL").unwrap_or(defaults.rpc_url),
            private_key: get("ETHEREUM_PRIVATE_KEY"),
            chain_id: chain_id.unwrap_or(defaults.chain_id),
            swap_address,
            token_address,
            swap_limits,
            poll_interval: poll_secs.map(Duration::from_secs).unwrap_or(defaults.poll_interval),
            refresh_debounce: debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.refresh_debounce),
            confirmation_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.confirmation_timeout),
            explorer_url: get("EXPLORER_URL").unwrap_or(defaults.explorer_url),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

/// Contract addresses must be `0x` followed by 40 hex characters.
fn parse_contract_address(name: &str, value: &str) -> Result<Address, AppError> {
    if value.len() != 42 || !(value.starts_with("0x") || value.starts_with("0X")) {
        return Err(AppError::Config(format!("Invalid contract address for {}: {}", name, value)));
    }
    value
        .parse::<Address>()
        .map_err(|e| AppError::Config(format!("Invalid contract address for {}: {}", name, e)))
}

fn parse_number(name: &str, value: &str) -> Result<u64, AppError> {
    value.parse::<u64>().map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

fn parse_eth(name: &str, value: &str) -> Result<U256, AppError> {
    parse_units(value, NATIVE_DECIMALS).map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}
