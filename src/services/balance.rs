//! Wallet balance queries.

use std::sync::Arc;

use crate::{
    error::Result,
    ethereum::SwapGateway,
    services::market::MarketWatcher,
    types::WalletInfo,
};

/// Service for querying the connected wallet's balances.
#[derive(Clone)]
pub struct BalanceService {
    gateway: Arc<dyn SwapGateway>,
    market: Arc<MarketWatcher>,
}

impl BalanceService {
    /// Create a new balance service.
    pub fn new(gateway: Arc<dyn SwapGateway>, market: Arc<MarketWatcher>) -> Self {
        Self { gateway, market }
    }

    /// Connection status and balances of the configured wallet.
    ///
    /// Served from the polled market state; balances are read directly when
    /// the poller has none yet.
    pub async fn wallet_info(&self) -> Result<WalletInfo> {
        let Some(owner) = self.gateway.wallet_address() else {
            return Ok(WalletInfo::disconnected());
        };

        tracing::debug!(address = %owner, "Querying wallet info");

        let state = self.market.current();
        let balances = match state.wallet {
            Some(balances) => balances,
            None => self.gateway.wallet_balances(owner).await?,
        };

        let (token, chain_id) = tokio::join!(self.gateway.token_metadata(), self.gateway.chain_id());
        let token = token?;

        Ok(WalletInfo::connected(&balances, &token, chain_id.ok()))
    }
}
