//! In-memory [`SwapGateway`] for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    ethereum::{constants::DEFAULT_MY_TOKEN_ADDRESS, SwapGateway},
    types::{amount::unit, GasEstimate, PoolSnapshot, TokenMetadata, WalletBalances},
};

pub const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const SWAP_CONTRACT: Address = address!("cf9857622dc4bdf71b1cdbbc7d3ad9215027afc6");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptOutcome {
    Success,
    Reverted,
    Timeout,
}

struct MockState {
    tokens_per_eth: U256,
    token_liquidity: U256,
    eth_reserve: U256,
    eth_balance: U256,
    token_balance: U256,
    receipt: ReceiptOutcome,
    simulation_error: Option<String>,
    swaps: Vec<(U256, Option<u64>)>,
    liquidity: Vec<U256>,
}

pub struct MockGateway {
    wallet: Option<Address>,
    state: Mutex<MockState>,
    fail_reads: AtomicBool,
    fail_wallet_reads: AtomicBool,
    pool_reads: AtomicUsize,
    nonce: AtomicUsize,
}

pub fn fluf() -> TokenMetadata {
    TokenMetadata {
        address: DEFAULT_MY_TOKEN_ADDRESS,
        name: "FluffyToken".to_string(),
        symbol: "FLUF".to_string(),
        decimals: 18,
    }
}

pub fn eth(amount: u64) -> U256 {
    U256::from(amount) * unit(18)
}

impl MockGateway {
    /// Wallet with 5 ETH and 2 000 FLUF; pool at 1 000 FLUF/ETH holding 500 000 FLUF.
    pub fn connected() -> Self {
        Self::with_wallet(Some(WALLET))
    }

    pub fn disconnected() -> Self {
        Self::with_wallet(None)
    }

    fn with_wallet(wallet: Option<Address>) -> Self {
        Self {
            wallet,
            state: Mutex::new(MockState {
                tokens_per_eth: U256::from(1000u64),
                token_liquidity: eth(500_000),
                eth_reserve: U256::ZERO,
                eth_balance: eth(5),
                token_balance: eth(2_000),
                receipt: ReceiptOutcome::Success,
                simulation_error: None,
                swaps: Vec::new(),
                liquidity: Vec::new(),
            }),
            fail_reads: AtomicBool::new(false),
            fail_wallet_reads: AtomicBool::new(false),
            pool_reads: AtomicUsize::new(0),
            nonce: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Fail only `wallet_balances`; pool reads keep working.
    pub fn set_fail_wallet_reads(&self, fail: bool) {
        self.fail_wallet_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_token_liquidity(&self, amount: U256) {
        self.state.lock().unwrap().token_liquidity = amount;
    }

    pub fn set_eth_balance(&self, amount: U256) {
        self.state.lock().unwrap().eth_balance = amount;
    }

    pub fn set_receipt(&self, outcome: ReceiptOutcome) {
        self.state.lock().unwrap().receipt = outcome;
    }

    pub fn set_simulation_error(&self, reason: &str) {
        self.state.lock().unwrap().simulation_error = Some(reason.to_string());
    }

    pub fn eth_balance(&self) -> U256 {
        self.state.lock().unwrap().eth_balance
    }

    pub fn pool_reads(&self) -> usize {
        self.pool_reads.load(Ordering::SeqCst)
    }

    pub fn sent_swaps(&self) -> Vec<(U256, Option<u64>)> {
        self.state.lock().unwrap().swaps.clone()
    }

    pub fn sent_liquidity(&self) -> Vec<U256> {
        self.state.lock().unwrap().liquidity.clone()
    }

    fn next_hash(&self) -> TxHash {
        let n = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        B256::with_last_byte(n as u8)
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SwapGateway for MockGateway {
    fn wallet_address(&self) -> Option<Address> {
        self.wallet
    }

    fn swap_contract(&self) -> Address {
        SWAP_CONTRACT
    }

    async fn chain_id(&self) -> Result<u64> {
        self.check_reads()?;
        Ok(11155111)
    }

    async fn token_metadata(&self) -> Result<TokenMetadata> {
        Ok(fluf())
    }

    async fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        self.check_reads()?;
        self.pool_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(PoolSnapshot {
            tokens_per_eth: state.tokens_per_eth,
            token_liquidity: state.token_liquidity,
            eth_reserve: state.eth_reserve,
            token: fluf(),
        })
    }

    async fn wallet_balances(&self, owner: Address) -> Result<WalletBalances> {
        self.check_reads()?;
        if self.fail_wallet_reads.load(Ordering::SeqCst) {
            return Err(AppError::Transport("balance read timed out".to_string()));
        }
        let state = self.state.lock().unwrap();
        Ok(WalletBalances { address: owner, eth: state.eth_balance, token: state.token_balance })
    }

    async fn estimate_swap(&self, _eth_amount: U256) -> Result<GasEstimate> {
        self.wallet.ok_or(AppError::WalletNotConnected)?;
        if let Some(reason) = self.state.lock().unwrap().simulation_error.clone() {
            return Err(AppError::SimulationFailed(reason));
        }
        Ok(GasEstimate { gas_limit: 120_000, gas_price: 2_000_000_000 })
    }

    async fn send_swap(&self, eth_amount: U256, gas_limit: Option<u64>) -> Result<TxHash> {
        self.wallet.ok_or(AppError::WalletNotConnected)?;
        self.state.lock().unwrap().swaps.push((eth_amount, gas_limit));
        Ok(self.next_hash())
    }

    async fn send_liquidity(&self, amount: U256) -> Result<TxHash> {
        self.wallet.ok_or(AppError::WalletNotConnected)?;
        self.state.lock().unwrap().liquidity.push(amount);
        Ok(self.next_hash())
    }

    async fn wait_for_receipt(&self, _tx_hash: TxHash, _timeout: Duration) -> Result<bool> {
        match self.state.lock().unwrap().receipt {
            ReceiptOutcome::Success => Ok(true),
            ReceiptOutcome::Reverted => Ok(false),
            ReceiptOutcome::Timeout => {
                Err(AppError::PendingTransaction("Timed out waiting for receipt".to_string()))
            }
        }
    }
}
