//! Pool liquidity: reporting and token deposits.

use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, Result},
    ethereum::SwapGateway,
    services::{market::MarketWatcher, transactions::TransactionTracker},
    types::{
        amount::{format_units, parse_units},
        PoolInfo, TokenMetadata, TransactionKind, TransactionRecord,
    },
};

/// Check a token amount to deposit against the wallet's token balance.
pub fn validate_liquidity_amount(input: &str, token_balance: U256, token: &TokenMetadata) -> Result<U256> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::AmountRequired);
    }

    let amount = parse_units(input, token.decimals).map_err(|_| AppError::InvalidAmount)?;
    if amount == U256::ZERO {
        return Err(AppError::InvalidAmount);
    }
    if amount > token_balance {
        return Err(AppError::InsufficientBalance { asset: token.symbol.clone() });
    }

    Ok(amount)
}

/// Service for the pool's token side.
#[derive(Clone)]
pub struct LiquidityService {
    gateway: Arc<dyn SwapGateway>,
    market: Arc<MarketWatcher>,
    tracker: Arc<TransactionTracker>,
    confirmation_timeout: Duration,
}

impl LiquidityService {
    pub fn new(
        gateway: Arc<dyn SwapGateway>,
        market: Arc<MarketWatcher>,
        tracker: Arc<TransactionTracker>,
        confirmation_timeout: Duration,
    ) -> Self {
        Self { gateway, market, tracker, confirmation_timeout }
    }

    /// Rate, reserves and liquidity status of the pool.
    pub async fn pool_info(&self) -> Result<PoolInfo> {
        let state = self.market.current_or_refresh().await?;
        let pool = state.require_pool()?;
        Ok(PoolInfo::from_snapshot(self.gateway.swap_contract(), pool, state.updated_at))
    }

    /// Transfer `input` tokens from the wallet into the swap contract.
    pub async fn add_liquidity(&self, input: &str, wait: bool) -> Result<TransactionRecord> {
        self.gateway.wallet_address().ok_or(AppError::WalletNotConnected)?;

        let state = self.market.refresh_for_write().await?;
        let token = &state.require_pool()?.token;
        let token_balance = match &state.wallet {
            Some(wallet) => wallet.token,
            None => return Err(AppError::Rpc("Wallet balance unavailable".to_string())),
        };

        let amount = validate_liquidity_amount(input, token_balance, token)?;
        let shown = format_units(amount, token.decimals);

        tracing::info!(
            amount = %shown,
            symbol = %token.symbol,
            pool = %self.gateway.swap_contract(),
            "Adding liquidity"
        );

        let tx_hash = self.gateway.send_liquidity(amount).await?;
        let summary = format!("{} {} -> pool", shown, token.symbol);
        self.tracker.submit(tx_hash, TransactionKind::AddLiquidity, summary).await?;

        self.tracker
            .follow(self.gateway.clone(), self.market.clone(), tx_hash, self.confirmation_timeout, wait)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eth, fluf, MockGateway};
    use crate::types::{LiquidityStatus, TransactionState};

    fn service(gateway: Arc<MockGateway>) -> LiquidityService {
        let market = Arc::new(MarketWatcher::new(gateway.clone(), Duration::from_secs(4), Duration::from_millis(10)));
        let tracker = Arc::new(TransactionTracker::new("https://sepolia.etherscan.io"));
        LiquidityService::new(gateway, market, tracker, Duration::from_secs(5))
    }

    #[test]
    fn test_validate_liquidity_amount() {
        let token = fluf();
        let balance = eth(100);

        assert!(matches!(validate_liquidity_amount(" ", balance, &token), Err(AppError::AmountRequired)));
        assert!(matches!(validate_liquidity_amount("x", balance, &token), Err(AppError::InvalidAmount)));
        assert!(matches!(validate_liquidity_amount("0", balance, &token), Err(AppError::InvalidAmount)));
        assert_eq!(
            validate_liquidity_amount("101", balance, &token).unwrap_err().to_string(),
            "Insufficient FLUF balance"
        );
        assert_eq!(validate_liquidity_amount("100", balance, &token).unwrap(), eth(100));
    }

    #[tokio::test]
    async fn test_pool_info() {
        let gateway = Arc::new(MockGateway::connected());
        let info = service(gateway.clone()).pool_info().await.unwrap();

        assert_eq!(info.tokens_per_eth, "1000");
        assert_eq!(info.token_liquidity, "500000");
        assert_eq!(info.liquidity_status, LiquidityStatus::High);
        assert!(info.low_liquidity_warning.is_none());

        gateway.set_token_liquidity(eth(250));
        let service = service(gateway);
        let info = service.pool_info().await.unwrap();
        assert_eq!(info.liquidity_status, LiquidityStatus::Low);
        assert!(info.low_liquidity_warning.unwrap().contains("250 FLUF"));
    }

    #[tokio::test]
    async fn test_add_liquidity() {
        let gateway = Arc::new(MockGateway::connected());
        let record = service(gateway.clone()).add_liquidity("150.5", true).await.unwrap();

        assert_eq!(record.kind, TransactionKind::AddLiquidity);
        assert_eq!(record.state, TransactionState::Success);
        assert_eq!(record.summary, "150.5 FLUF -> pool");
        assert_eq!(gateway.sent_liquidity(), vec![U256::from(150_500_000_000_000_000_000u128)]);
    }

    #[tokio::test]
    async fn test_add_liquidity_over_balance_is_not_sent() {
        let gateway = Arc::new(MockGateway::connected());
        let result = service(gateway.clone()).add_liquidity("5000", true).await;

        assert!(matches!(result, Err(AppError::InsufficientBalance { .. })));
        assert!(gateway.sent_liquidity().is_empty());
    }

    #[tokio::test]
    async fn test_add_liquidity_with_unreadable_balance_is_not_sent() {
        let gateway = Arc::new(MockGateway::connected());
        let service = service(gateway.clone());
        service.pool_info().await.unwrap();

        gateway.set_fail_wallet_reads(true);
        let result = service.add_liquidity("10", true).await;

        assert!(matches!(result, Err(AppError::Transport(_))));
        assert!(gateway.sent_liquidity().is_empty());
    }

    #[tokio::test]
    async fn test_add_liquidity_requires_wallet() {
        let result = service(Arc::new(MockGateway::disconnected())).add_liquidity("1", true).await;
        assert!(matches!(result, Err(AppError::WalletNotConnected)));
    }
}
