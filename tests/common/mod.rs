//! Common utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;

use fluffyswap_mcp::{
    ethereum::SwapGateway,
    types::{GasEstimate, PoolSnapshot, TokenMetadata, WalletBalances},
    AppError, Config, FluffySwapServer, Result, DEFAULT_MY_TOKEN_ADDRESS,
};

pub const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Helper to create a test server from environment variables.
pub fn create_test_server() -> Option<FluffySwapServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let rpc_url = std::env::var("ETHEREUM_RPC_URL").ok()?;
    if rpc_url.is_empty() {
        return None;
    }

    let mut config = Config::from_env().ok()?;
    config.log_level = "warn".to_string();

    FluffySwapServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: ETHEREUM_RPC_URL not set");
                return;
            }
        }
    };
}

/// `n` whole units of an 18-decimal amount.
pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// Gateway double: 1 000 FLUF per ETH, 500 000 FLUF in the pool, and a
/// wallet holding 5 ETH and 2 000 FLUF.
pub struct StubGateway {
    wallet: Option<Address>,
    token_liquidity: Mutex<U256>,
    hold_receipts: AtomicBool,
    nonce: AtomicU8,
}

impl StubGateway {
    pub fn new(connected: bool) -> Self {
        Self {
            wallet: connected.then_some(WALLET),
            token_liquidity: Mutex::new(units(500_000)),
            hold_receipts: AtomicBool::new(false),
            nonce: AtomicU8::new(0),
        }
    }

    pub fn set_token_liquidity(&self, amount: U256) {
        *self.token_liquidity.lock().unwrap() = amount;
    }

    /// Receipts never arrive while held.
    pub fn hold_receipts(&self, hold: bool) {
        self.hold_receipts.store(hold, Ordering::SeqCst);
    }

    fn token() -> TokenMetadata {
        TokenMetadata {
            address: DEFAULT_MY_TOKEN_ADDRESS,
            name: "FluffyToken".to_string(),
            symbol: "FLUF".to_string(),
            decimals: 18,
        }
    }
}

#[async_trait]
impl SwapGateway for StubGateway {
    fn wallet_address(&self) -> Option<Address> {
        self.wallet
    }

    fn swap_contract(&self) -> Address {
        address!("cf9857622dc4bdf71b1cdbbc7d3ad9215027afc6")
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(11155111)
    }

    async fn token_metadata(&self) -> Result<TokenMetadata> {
        Ok(Self::token())
    }

    async fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        Ok(PoolSnapshot {
            tokens_per_eth: U256::from(1000u64),
            token_liquidity: *self.token_liquidity.lock().unwrap(),
            eth_reserve: units(3),
            token: Self::token(),
        })
    }

    async fn wallet_balances(&self, owner: Address) -> Result<WalletBalances> {
        Ok(WalletBalances { address: owner, eth: units(5), token: units(2_000) })
    }

    async fn estimate_swap(&self, _eth_amount: U256) -> Result<GasEstimate> {
        Ok(GasEstimate { gas_limit: 60_000, gas_price: 1_000_000_000 })
    }

    async fn send_swap(&self, _eth_amount: U256, _gas_limit: Option<u64>) -> Result<TxHash> {
        self.wallet.ok_or(AppError::WalletNotConnected)?;
        Ok(B256::with_last_byte(self.nonce.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn send_liquidity(&self, _amount: U256) -> Result<TxHash> {
        self.wallet.ok_or(AppError::WalletNotConnected)?;
        Ok(B256::with_last_byte(self.nonce.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn wait_for_receipt(&self, _tx_hash: TxHash, _timeout: Duration) -> Result<bool> {
        if self.hold_receipts.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        Ok(true)
    }
}

/// Server backed by a [`StubGateway`]; no network access.
pub fn offline_server(connected: bool) -> (FluffySwapServer, Arc<StubGateway>) {
    let gateway = Arc::new(StubGateway::new(connected));
    let server = FluffySwapServer::with_gateway(gateway.clone(), &Config::default());
    (server, gateway)
}

/// Parse a tool's JSON output.
pub fn json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).expect("tool output should be JSON")
}
