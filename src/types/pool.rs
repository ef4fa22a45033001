//! Pool and wallet state types.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::ethereum::constants::{
    LOW_LIQUIDITY_THRESHOLD, MEDIUM_LIQUIDITY_THRESHOLD, NATIVE_DECIMALS,
};
use crate::types::amount::{format_fixed, format_units, whole_units};

/// Token metadata read from the token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token contract address.
    pub address: Address,
    /// Token name (e.g., "FluffyToken").
    pub name: String,
    /// Token symbol (e.g., "FLUF").
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
}

/// One read of the swap contract's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Whole tokens received per whole ETH.
    pub tokens_per_eth: U256,
    /// Tokens held by the swap contract, in raw units.
    pub token_liquidity: U256,
    /// ETH held by the swap contract, in wei.
    pub eth_reserve: U256,
    /// The traded token.
    pub token: TokenMetadata,
}

impl PoolSnapshot {
    pub fn liquidity_status(&self) -> LiquidityStatus {
        LiquidityStatus::classify(self.token_liquidity, self.token.decimals)
    }

    pub fn has_liquidity(&self) -> bool {
        self.token_liquidity > U256::ZERO
    }
}

/// Coarse liquidity depth of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityStatus {
    /// No tokens available.
    Empty,
    /// Fewer than 1 000 tokens.
    Low,
    /// Fewer than 10 000 tokens.
    Medium,
    /// 10 000 tokens or more.
    High,
}

impl LiquidityStatus {
    /// Classify a raw token balance.
    pub fn classify(liquidity: U256, decimals: u8) -> Self {
        if liquidity == U256::ZERO {
            return Self::Empty;
        }
        // Compare the exact raw amount against whole-token thresholds.
        let scale = crate::types::amount::unit(decimals);
        if liquidity < U256::from(LOW_LIQUIDITY_THRESHOLD) * scale {
            Self::Low
        } else if liquidity < U256::from(MEDIUM_LIQUIDITY_THRESHOLD) * scale {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "No tokens available",
            Self::Low => "Limited swapping capacity",
            Self::Medium => "Good for small swaps",
            Self::High => "Excellent liquidity depth",
        }
    }

    /// Whether the pool should be flagged as needing more liquidity.
    pub fn is_low(&self) -> bool {
        matches!(self, Self::Empty | Self::Low)
    }
}

/// Balances of the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletBalances {
    /// Wallet address.
    pub address: Address,
    /// Native balance in wei.
    pub eth: U256,
    /// Token balance in raw units.
    pub token: U256,
}

/// Pool information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Swap contract address.
    pub swap_contract: String,
    /// Traded token.
    pub token: TokenMetadata,
    /// Whole tokens per ETH.
    pub tokens_per_eth: String,
    /// Pool token balance (human-readable).
    pub token_liquidity: String,
    /// Pool token balance in raw units.
    pub token_liquidity_raw: String,
    /// Pool ETH balance, four decimals.
    pub eth_reserve: String,
    /// Pool ETH balance in wei.
    pub eth_reserve_raw: String,
    /// Liquidity classification.
    pub liquidity_status: LiquidityStatus,
    /// Human-readable liquidity description.
    pub liquidity_message: String,
    /// Set when the pool holds fewer than 1 000 tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_liquidity_warning: Option<String>,
    /// Unix timestamp of the underlying read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl PoolInfo {
    pub fn from_snapshot(swap_contract: Address, pool: &PoolSnapshot, updated_at: Option<u64>) -> Self {
        let status = pool.liquidity_status();
        let decimals = pool.token.decimals;
        let low_liquidity_warning = status.is_low().then(|| {
            format!(
                "Contract has {} {} tokens. Add more liquidity to enable larger swaps.",
                whole_units(pool.token_liquidity, decimals),
                pool.token.symbol
            )
        });

        Self {
            swap_contract: format!("{swap_contract:?}"),
            token: pool.token.clone(),
            tokens_per_eth: pool.tokens_per_eth.to_string(),
            token_liquidity: format_units(pool.token_liquidity, decimals),
            token_liquidity_raw: pool.token_liquidity.to_string(),
            eth_reserve: format_fixed(pool.eth_reserve, NATIVE_DECIMALS, 4),
            eth_reserve_raw: pool.eth_reserve.to_string(),
            liquidity_status: status,
            liquidity_message: status.message().to_string(),
            low_liquidity_warning,
            updated_at,
        }
    }
}

/// Wallet information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Whether a signing key is configured.
    pub connected: bool,
    /// Wallet address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Chain the RPC endpoint serves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// ETH balance, four decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_balance: Option<String>,
    /// ETH balance in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_balance_raw: Option<String>,
    /// Token symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    /// Token balance, two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_balance: Option<String>,
    /// Token balance in raw units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_balance_raw: Option<String>,
    /// Hint shown when no wallet is connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WalletInfo {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            address: None,
            chain_id: None,
            eth_balance: None,
            eth_balance_raw: None,
            token_symbol: None,
            token_balance: None,
            token_balance_raw: None,
            message: Some("Please connect your wallet to continue".to_string()),
        }
    }

    pub fn connected(balances: &WalletBalances, token: &TokenMetadata, chain_id: Option<u64>) -> Self {
        Self {
            connected: true,
            address: Some(format!("{:?}", balances.address)),
            chain_id,
            eth_balance: Some(format_fixed(balances.eth, NATIVE_DECIMALS, 4)),
            eth_balance_raw: Some(balances.eth.to_string()),
            token_symbol: Some(token.symbol.clone()),
            token_balance: Some(format_fixed(balances.token, token.decimals, 2)),
            token_balance_raw: Some(balances.token.to_string()),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::amount::unit;
    use alloy::primitives::address;

    fn fluf() -> TokenMetadata {
        TokenMetadata {
            address: address!("02a9fc62de4a523c16a0f056a1db92b3cef10a58"),
            name: "FluffyToken".to_string(),
            symbol: "FLUF".to_string(),
            decimals: 18,
        }
    }

    fn pool_with(tokens: u64) -> PoolSnapshot {
        PoolSnapshot {
            tokens_per_eth: U256::from(1000u64),
            token_liquidity: U256::from(tokens) * unit(18),
            eth_reserve: U256::from(1_234_567_000_000_000_000u64),
            token: fluf(),
        }
    }

    #[test]
    fn test_liquidity_status_thresholds() {
        assert_eq!(pool_with(0).liquidity_status(), LiquidityStatus::Empty);
        assert_eq!(pool_with(999).liquidity_status(), LiquidityStatus::Low);
        assert_eq!(pool_with(1_000).liquidity_status(), LiquidityStatus::Medium);
        assert_eq!(pool_with(9_999).liquidity_status(), LiquidityStatus::Medium);
        assert_eq!(pool_with(10_000).liquidity_status(), LiquidityStatus::High);
    }

    #[test]
    fn test_liquidity_status_dust_is_low_not_empty() {
        let status = LiquidityStatus::classify(U256::from(1u64), 18);
        assert_eq!(status, LiquidityStatus::Low);
    }

    #[test]
    fn test_liquidity_status_serialization() {
        assert_eq!(serde_json::to_string(&LiquidityStatus::Medium).unwrap(), "\"medium\"");
        assert_eq!(LiquidityStatus::High.message(), "Excellent liquidity depth");
    }

    #[test]
    fn test_pool_info_low_liquidity_warning() {
        let pool = pool_with(500);
        let info = PoolInfo::from_snapshot(Address::ZERO, &pool, Some(1));

        let warning = info.low_liquidity_warning.expect("low pool should warn");
        assert!(warning.contains("500 FLUF"));
        assert_eq!(info.eth_reserve, "1.2346");
        assert_eq!(info.tokens_per_eth, "1000");
    }

    #[test]
    fn test_pool_info_healthy_pool_has_no_warning() {
        let info = PoolInfo::from_snapshot(Address::ZERO, &pool_with(500_000), None);
        assert!(info.low_liquidity_warning.is_none());

        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("low_liquidity_warning"));
        assert!(!json.contains("updated_at"));
        assert!(json.contains("\"liquidity_status\":\"high\""));
    }

    #[test]
    fn test_wallet_info_connected_formatting() {
        let balances = WalletBalances {
            address: Address::ZERO,
            eth: U256::from(1_500_000_000_000_000_000u64),
            token: U256::from(42u64) * unit(18),
        };
        let info = WalletInfo::connected(&balances, &fluf(), Some(11155111));

        assert!(info.connected);
        assert_eq!(info.eth_balance.as_deref(), Some("1.5000"));
        assert_eq!(info.token_balance.as_deref(), Some("42.00"));
        assert_eq!(info.token_symbol.as_deref(), Some("FLUF"));
    }

    #[test]
    fn test_wallet_info_disconnected_serialization() {
        let json = serde_json::to_string(&WalletInfo::disconnected()).unwrap();
        assert!(json.contains("\"connected\":false"));
        assert!(!json.contains("address"));
        assert!(json.contains("connect your wallet"));
    }
}
