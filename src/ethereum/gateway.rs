//! Contract access for the swap and token contracts.

use std::sync::Arc;
use std::time::Duration;

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::{PendingTransactionBuilder, Provider},
};
use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{FALLBACK_SWAP_GAS, GAS_LIMIT_BUFFER},
        contracts::{IFluffySwap, IMyToken},
        EthereumClient, WalletConnection,
    },
    types::{GasEstimate, PoolSnapshot, TokenMetadata, WalletBalances},
};

/// Reads and writes against the FluffySwap deployment.
///
/// The services only talk to this trait, so they can run against a live node
/// or an in-memory double.
#[async_trait]
pub trait SwapGateway: Send + Sync {
    /// Connected wallet address, if any.
    fn wallet_address(&self) -> Option<Address>;

    /// Swap contract address (destination of liquidity transfers).
    fn swap_contract(&self) -> Address;

    /// Chain the node serves.
    async fn chain_id(&self) -> Result<u64>;

    /// Token name, symbol and decimals.
    async fn token_metadata(&self) -> Result<TokenMetadata>;

    /// Rate and reserves of the swap contract.
    async fn pool_snapshot(&self) -> Result<PoolSnapshot>;

    /// ETH and token balance of `owner`.
    async fn wallet_balances(&self, owner: Address) -> Result<WalletBalances>;

    /// Dry-run a swap of `eth_amount` and estimate its gas.
    async fn estimate_swap(&self, eth_amount: U256) -> Result<GasEstimate>;

    /// Broadcast `swapEthForTokens` with `eth_amount` attached.
    async fn send_swap(&self, eth_amount: U256, gas_limit: Option<u64>) -> Result<TxHash>;

    /// Broadcast a token transfer of `amount` into the swap contract.
    async fn send_liquidity(&self, amount: U256) -> Result<TxHash>;

    /// Wait for the receipt; `Ok(true)` when the transaction succeeded.
    async fn wait_for_receipt(&self, tx_hash: TxHash, timeout: Duration) -> Result<bool>;
}

/// On-chain [`SwapGateway`] backed by an [`EthereumClient`].
pub struct ChainGateway {
    client: Arc<EthereumClient>,
    wallet: WalletConnection,
    swap_address: Address,
    token_address: Address,
    expected_chain_id: u64,
    token: OnceCell<TokenMetadata>,
}

impl ChainGateway {
    pub fn new(
        client: Arc<EthereumClient>,
        wallet: WalletConnection,
        swap_address: Address,
        token_address: Address,
        expected_chain_id: u64,
    ) -> Self {
        Self {
            client,
            wallet,
            swap_address,
            token_address,
            expected_chain_id,
            token: OnceCell::new(),
        }
    }

    fn swap(&self) -> IFluffySwap::IFluffySwapInstance<crate::ethereum::HttpProvider> {
        IFluffySwap::new(self.swap_address, self.client.provider().clone())
    }

    fn token(&self) -> IMyToken::IMyTokenInstance<crate::ethereum::HttpProvider> {
        IMyToken::new(self.token_address, self.client.provider().clone())
    }

    /// Writes need a signer and the configured chain.
    async fn ready_to_send(&self) -> Result<Address> {
        let from = self.wallet.require_address()?;
        self.client.ensure_chain(self.expected_chain_id).await?;
        Ok(from)
    }
}

#[async_trait]
impl SwapGateway for ChainGateway {
    fn wallet_address(&self) -> Option<Address> {
        self.wallet.address()
    }

    fn swap_contract(&self) -> Address {
        self.swap_address
    }

    async fn chain_id(&self) -> Result<u64> {
        self.client.chain_id().await
    }

    async fn token_metadata(&self) -> Result<TokenMetadata> {
        self.token
            .get_or_try_init(|| async {
                let contract = self.token();
                let symbol = contract.symbol().call().await?;
                let name = contract.name().call().await.unwrap_or_else(|_| symbol.clone());
                let decimals = contract.decimals().call().await?;

                tracing::info!(
                    token = %self.token_address,
                    symbol = %symbol,
                    decimals = decimals,
                    "Loaded token metadata"
                );

                Ok(TokenMetadata { address: self.token_address, name, symbol, decimals })
            })
            .await
            .cloned()
    }

    async fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        let token = self.token_metadata().await?;
        let swap = self.swap();

        let rate_call = swap.tokensPerEth();
        let liquidity_call = swap.getTokenBalance();
        let reserve_call = swap.getEthBalance();
        let (tokens_per_eth, token_liquidity, eth_reserve) =
            tokio::try_join!(rate_call.call(), liquidity_call.call(), reserve_call.call())?;

        tracing::debug!(
            tokens_per_eth = %tokens_per_eth,
            token_liquidity = %token_liquidity,
            eth_reserve = %eth_reserve,
            "Read pool state"
        );

        Ok(PoolSnapshot { tokens_per_eth, token_liquidity, eth_reserve, token })
    }

    async fn wallet_balances(&self, owner: Address) -> Result<WalletBalances> {
        tracing::debug!(address = %owner, "Querying wallet balances");

        let token = self.token();
        let balance_call = token.balanceOf(owner);
        let (eth, token_balance) =
            tokio::try_join!(self.client.get_eth_balance(owner), async {
                balance_call.call().await.map_err(AppError::from)
            })?;

        Ok(WalletBalances { address: owner, eth, token: token_balance })
    }

    async fn estimate_swap(&self, eth_amount: U256) -> Result<GasEstimate> {
        let from = self.wallet.require_address()?;
        let swap = self.swap();
        let call = swap.swapEthForTokens().value(eth_amount).from(from);

        if let Err(e) = call.call().await {
            let reason = describe_revert(&e.to_string());
            tracing::warn!(error = %e, "Swap simulation failed - transaction would revert");
            return Err(AppError::SimulationFailed(reason));
        }

        let gas = call.estimate_gas().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, fallback = FALLBACK_SWAP_GAS, "Gas estimation failed, using fallback");
            FALLBACK_SWAP_GAS
        });
        let gas_price = self.client.get_gas_price().await?;

        let (num, den) = GAS_LIMIT_BUFFER;
        let gas_limit = gas.saturating_mul(num) / den;

        tracing::debug!(gas = gas, gas_limit = gas_limit, gas_price = gas_price, "Swap simulation ok");

        Ok(GasEstimate { gas_limit, gas_price })
    }

    async fn send_swap(&self, eth_amount: U256, gas_limit: Option<u64>) -> Result<TxHash> {
        let from = self.ready_to_send().await?;

        let swap = self.swap();
        let mut call = swap.swapEthForTokens().value(eth_amount).from(from);
        if let Some(gas) = gas_limit {
            call = call.gas(gas);
        }

        let pending = call.send().await?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, value = %eth_amount, "Swap transaction submitted");
        Ok(tx_hash)
    }

    async fn send_liquidity(&self, amount: U256) -> Result<TxHash> {
        let from = self.ready_to_send().await?;

        let pending = self.token().transfer(self.swap_address, amount).from(from).send().await?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, amount = %amount, "Liquidity transfer submitted");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash, timeout: Duration) -> Result<bool> {
        let receipt = PendingTransactionBuilder::new(self.client.provider().root().clone(), tx_hash)
            .with_timeout(Some(timeout))
            .get_receipt()
            .await?;

        tracing::debug!(
            tx_hash = %tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Receipt received"
        );

        Ok(receipt.status())
    }
}

/// Turn a node's revert message into something a user can act on.
pub fn describe_revert(error_msg: &str) -> String {
    let lower = error_msg.to_lowercase();
    if lower.contains("insufficient funds") {
        "Insufficient ETH to cover the swap and gas".to_string()
    } else if lower.contains("insufficient") && lower.contains("token") {
        "Insufficient liquidity in the pool".to_string()
    } else if lower.contains("execution reverted") {
        format!("Transaction would revert: {}", error_msg)
    } else {
        format!("Simulation failed: {}", error_msg)
    }
}
