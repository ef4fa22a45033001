//! ETH to token swap execution.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, Result},
    ethereum::{constants::NATIVE_DECIMALS, SwapGateway},
    services::{market::MarketWatcher, quote::validate_swap_amount, transactions::TransactionTracker},
    types::{
        amount::{format_fixed, format_units},
        SwapLimits, TransactionKind, TransactionRecord,
    },
};

/// Service for submitting swaps.
#[derive(Clone)]
pub struct SwapService {
    gateway: Arc<dyn SwapGateway>,
    market: Arc<MarketWatcher>,
    tracker: Arc<TransactionTracker>,
    limits: SwapLimits,
    confirmation_timeout: Duration,
}

impl SwapService {
    /// Create a new swap service.
    pub fn new(
        gateway: Arc<dyn SwapGateway>,
        market: Arc<MarketWatcher>,
        tracker: Arc<TransactionTracker>,
        limits: SwapLimits,
        confirmation_timeout: Duration,
    ) -> Self {
        Self { gateway, market, tracker, limits, confirmation_timeout }
    }

    /// Swap `input` ETH for tokens.
    ///
    /// The amount is checked against fresh balances and simulated before
    /// anything is broadcast. With `wait` the call returns the settled
    /// record; otherwise it returns the pending record and the receipt is
    /// followed in the background.
    pub async fn swap(&self, input: &str, wait: bool) -> Result<TransactionRecord> {
        self.gateway.wallet_address().ok_or(AppError::WalletNotConnected)?;

        let state = self.market.refresh_for_write().await?;
        let pool = state.require_pool()?;
        let eth_balance = state.wallet.as_ref().map(|w| w.eth);

        let (eth_amount, token_amount) = validate_swap_amount(input, &self.limits, eth_balance, pool)?;

        tracing::info!(
            eth = %format_units(eth_amount, NATIVE_DECIMALS),
            tokens = %format_units(token_amount, pool.token.decimals),
            rate = %pool.tokens_per_eth,
            "Submitting swap"
        );

        let gas = self.gateway.estimate_swap(eth_amount).await?;
        let tx_hash = self.gateway.send_swap(eth_amount, Some(gas.gas_limit)).await?;

        let summary = format!(
            "{} ETH -> {} {}",
            format_units(eth_amount, NATIVE_DECIMALS),
            format_fixed(token_amount, pool.token.decimals, 6),
            pool.token.symbol
        );
        self.tracker.submit(tx_hash, TransactionKind::Swap, summary).await?;

        self.tracker
            .follow(self.gateway.clone(), self.market.clone(), tx_hash, self.confirmation_timeout, wait)
            .await
    }
}
