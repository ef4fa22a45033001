//! Swap-related types.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::ethereum::constants::NATIVE_DECIMALS;
use crate::types::amount::{format_units, parse_units};

/// Client-side bounds on a single swap, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLimits {
    pub min_eth: U256,
    pub max_eth: U256,
}

impl SwapLimits {
    /// Build limits from human-readable ETH amounts.
    pub fn from_eth(min: &str, max: &str) -> Result<Self> {
        Self::new(parse_units(min, NATIVE_DECIMALS)?, parse_units(max, NATIVE_DECIMALS)?)
    }

    /// Build limits from wei, requiring `0 < min <= max`.
    pub fn new(min_eth: U256, max_eth: U256) -> Result<Self> {
        if min_eth == U256::ZERO || min_eth > max_eth {
            return Err(AppError::Config(format!(
                "Swap limits must satisfy 0 < min <= max (got min {}, max {})",
                format_units(min_eth, NATIVE_DECIMALS),
                format_units(max_eth, NATIVE_DECIMALS)
            )));
        }

        Ok(Self { min_eth, max_eth })
    }

    pub fn min_display(&self) -> String {
        format_units(self.min_eth, NATIVE_DECIMALS)
    }

    pub fn max_display(&self) -> String {
        format_units(self.max_eth, NATIVE_DECIMALS)
    }
}

impl Default for SwapLimits {
    fn default() -> Self {
        // 0.001 ETH and 10 ETH
        Self {
            min_eth: U256::from(1_000_000_000_000_000u64),
            max_eth: U256::from(10_000_000_000_000_000_000u128),
        }
    }
}

/// Gas figures for a simulated swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimate {
    /// Gas limit including the safety buffer.
    pub gas_limit: u64,
    /// Current gas price in wei.
    pub gas_price: u128,
}

impl GasEstimate {
    /// Worst-case fee in wei.
    pub fn max_cost_wei(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.gas_price)
    }
}

/// Result of a swap quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Whether the input passes every check and the swap can be submitted.
    pub valid: bool,
    /// First failing check, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
    /// ETH input (human-readable); empty when the input did not parse.
    pub eth_amount: String,
    /// ETH input in wei.
    pub eth_amount_raw: String,
    /// Tokens received, six decimals.
    pub token_amount: String,
    /// Tokens received in raw units.
    pub token_amount_raw: String,
    /// Token symbol.
    pub token_symbol: String,
    /// Whole tokens per ETH.
    pub tokens_per_eth: String,
    /// Pool token balance (human-readable).
    pub pool_token_liquidity: String,
    /// Configured minimum swap (ETH).
    pub min_eth: String,
    /// Configured maximum swap (ETH).
    pub max_eth: String,
    /// Estimated gas units (buffered), when a wallet is connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    /// Gas price in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Worst-case gas cost in ETH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_cost_eth: Option<String>,
}

/// Largest swap the wallet can submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxSwapAmount {
    /// Maximum ETH (human-readable).
    pub eth_amount: String,
    /// Maximum ETH in wei.
    pub eth_amount_raw: String,
    /// ETH held back for gas.
    pub gas_reserve: String,
    /// Configured maximum swap (ETH).
    pub limit: String,
}
