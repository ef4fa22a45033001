//! Ethereum RPC client.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, Result},
    ethereum::WalletConnection,
};

/// Type alias for the type-erased HTTP provider.
pub type HttpProvider = DynProvider<Ethereum>;

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider (signing when a wallet is connected).
    provider: HttpProvider,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str, wallet: &WalletConnection) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = match wallet.ethereum_wallet() {
            Some(signer) => ProviderBuilder::new().wallet(signer).connect_http(url).erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        tracing::info!(
            rpc_url = %rpc_url,
            signing = wallet.is_connected(),
            "Ethereum client created (lazy initialization)"
        );

        Ok(Self::with_provider(provider, rpc_url))
    }

    /// Wrap an already built provider.
    pub fn with_provider(provider: HttpProvider, rpc_url: impl Into<String>) -> Self {
        Self { provider, rpc_url: rpc_url.into(), chain_id: Arc::new(OnceCell::new()) }
    }

    /// Get the chain ID (fetches from network on first call).
    pub async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                tracing::info!(chain_id = chain_id, rpc_url = %self.rpc_url, "Connected to Ethereum node");
                Ok(chain_id)
            })
            .await
            .copied()
    }

    /// Fail with `WrongNetwork` unless the node serves `expected`.
    pub async fn ensure_chain(&self, expected: u64) -> Result<()> {
        let actual = self.chain_id().await?;
        if actual != expected {
            return Err(AppError::WrongNetwork { expected, actual });
        }
        Ok(())
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Get native ETH balance for an address.
    pub async fn get_eth_balance(&self, address: Address) -> Result<U256> {
        let balance = self.provider.get_balance(address).await?;
        Ok(balance)
    }

    /// Get current gas price.
    pub async fn get_gas_price(&self) -> Result<u128> {
        let gas_price = self.provider.get_gas_price().await?;
        Ok(gas_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::mock::Asserter;

    fn mocked() -> (EthereumClient, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        (EthereumClient::with_provider(provider, "mock"), asserter)
    }

    #[tokio::test]
    async fn test_chain_id_fetched_once() {
        let (client, asserter) = mocked();
        asserter.push_success(&"0x7a69");

        assert_eq!(client.chain_id().await.unwrap(), 31337);
        // nothing left queued, so this must come from the cache
        assert_eq!(client.chain_id().await.unwrap(), 31337);
    }

    #[tokio::test]
    async fn test_ensure_chain_rejects_other_network() {
        let (client, asserter) = mocked();
        asserter.push_success(&"0x1");

        match client.ensure_chain(11155111).await {
            Err(AppError::WrongNetwork { expected, actual }) => {
                assert_eq!(expected, 11155111);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(client.ensure_chain(1).await.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let result = EthereumClient::new("not a url", &WalletConnection::Disconnected);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_client_creation_is_lazy() {
        // Nothing listens on this port; creation must still succeed.
        let client = EthereumClient::new("http://127.0.0.1:1", &WalletConnection::Disconnected);
        assert!(client.is_ok());
    }
}
