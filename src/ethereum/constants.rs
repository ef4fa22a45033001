//! Network constants.
//!
//! Contains chain IDs, default deployment addresses and client-side limits.

use alloy::primitives::{address, Address, U256};

// ============================================================================
// Chain IDs
// ============================================================================

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Local Hardhat node chain ID.
pub const HARDHAT_CHAIN_ID: u64 = 31337;

/// Default chain ID (Sepolia).
pub const DEFAULT_CHAIN_ID: u64 = SEPOLIA_CHAIN_ID;

// ============================================================================
// Endpoints
// ============================================================================

/// Public Sepolia RPC used when no endpoint is configured.
pub const DEFAULT_RPC_URL: &str = "https://rpc.sepolia.org";

/// Sepolia block explorer.
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

// ============================================================================
// Deployments (Sepolia)
// ============================================================================

/// FluffySwap exchange contract.
pub const DEFAULT_FLUFFY_SWAP_ADDRESS: Address =
    address!("cf9857622dc4bdf71b1cdbbc7d3ad9215027afc6");

/// MyToken (FLUF) contract.
pub const DEFAULT_MY_TOKEN_ADDRESS: Address = address!("02a9fc62de4a523c16a0f056a1db92b3cef10a58");

// ============================================================================
// Native currency
// ============================================================================

/// Native currency symbol.
pub const NATIVE_SYMBOL: &str = "ETH";

/// Native currency decimals.
pub const NATIVE_DECIMALS: u8 = 18;

// ============================================================================
// Client-side limits
// ============================================================================

/// Default minimum swap amount (ETH).
pub const DEFAULT_MIN_SWAP_ETH: &str = "0.001";

/// Default maximum swap amount (ETH).
pub const DEFAULT_MAX_SWAP_ETH: &str = "10";

/// ETH kept back for gas when computing the maximum swap amount (0.01 ETH).
pub const GAS_RESERVE_WEI: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Gas limit buffer applied to estimates, as numerator / denominator (x1.2).
pub const GAS_LIMIT_BUFFER: (u64, u64) = (12, 10);

/// Fallback gas limit when estimation is unavailable.
pub const FALLBACK_SWAP_GAS: u64 = 100_000;

/// Pool token balance (whole tokens) below which liquidity is reported as low.
pub const LOW_LIQUIDITY_THRESHOLD: u64 = 1_000;

/// Pool token balance (whole tokens) below which liquidity is reported as medium.
pub const MEDIUM_LIQUIDITY_THRESHOLD: u64 = 10_000;
