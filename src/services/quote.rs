//! Swap quoting and input validation.

use alloy::primitives::U256;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{GAS_RESERVE_WEI, NATIVE_DECIMALS, NATIVE_SYMBOL},
        SwapGateway,
    },
    services::market::MarketWatcher,
    types::{
        amount::{format_fixed, format_units, parse_units, unit},
        MaxSwapAmount, PoolSnapshot, SwapLimits, SwapQuote,
    },
};

/// Tokens (raw units) received for `eth_amount` wei at `tokens_per_eth`.
///
/// Mirrors `calculateTokenAmount` on the swap contract:
/// `eth × rate × 10^decimals / 10^18`.
pub fn calculate_token_amount(eth_amount: U256, tokens_per_eth: U256, token_decimals: u8) -> Result<U256> {
    eth_amount
        .checked_mul(tokens_per_eth)
        .and_then(|v| v.checked_mul(unit(token_decimals)))
        .map(|v| v / unit(NATIVE_DECIMALS))
        .ok_or_else(|| {
            AppError::NumericOverflow(format!(
                "{} wei at {} tokens per ETH does not fit 256 bits",
                eth_amount, tokens_per_eth
            ))
        })
}

/// Check a user-entered ETH amount, returning `(wei, tokens)` when it can be swapped.
///
/// Checks run in a fixed order and the first failure wins. The balance check
/// is skipped when `eth_balance` is unknown.
pub fn validate_swap_amount(
    input: &str,
    limits: &SwapLimits,
    eth_balance: Option<U256>,
    pool: &PoolSnapshot,
) -> Result<(U256, U256)> {
    let input = input.trim();
    if input.is_empty() || input == "0" {
        return Err(AppError::AmountRequired);
    }

    let eth_amount = parse_units(input, NATIVE_DECIMALS).map_err(|_| AppError::InvalidAmount)?;
    if eth_amount == U256::ZERO {
        return Err(AppError::InvalidAmount);
    }

    if eth_amount < limits.min_eth {
        return Err(AppError::AmountTooLow { min: limits.min_display() });
    }
    if eth_amount > limits.max_eth {
        return Err(AppError::AmountTooHigh { max: limits.max_display() });
    }

    if let Some(balance) = eth_balance {
        if eth_amount > balance {
            return Err(AppError::InsufficientBalance { asset: NATIVE_SYMBOL.to_string() });
        }
    }

    let tokens = calculate_token_amount(eth_amount, pool.tokens_per_eth, pool.token.decimals)?;
    if !pool.has_liquidity() || pool.token_liquidity < tokens {
        return Err(AppError::InsufficientLiquidity);
    }

    Ok((eth_amount, tokens))
}

/// Largest swap that leaves [`GAS_RESERVE_WEI`] for fees and respects the limit.
pub fn max_swap_amount(eth_balance: U256, limits: &SwapLimits) -> U256 {
    eth_balance.saturating_sub(GAS_RESERVE_WEI).min(limits.max_eth)
}

/// Service producing swap quotes from the latest market state.
#[derive(Clone)]
pub struct QuoteService {
    gateway: Arc<dyn SwapGateway>,
    market: Arc<MarketWatcher>,
    limits: SwapLimits,
}

impl QuoteService {
    pub fn new(gateway: Arc<dyn SwapGateway>, market: Arc<MarketWatcher>, limits: SwapLimits) -> Self {
        Self { gateway, market, limits }
    }

    /// Quote `input` ETH.
    ///
    /// Validation failures are reported in the quote rather than as errors;
    /// only a missing pool read fails the call.
    pub async fn quote(&self, input: &str) -> Result<SwapQuote> {
        let state = self.market.current_or_refresh().await?;
        let pool = state.require_pool()?;
        let eth_balance = state.wallet.as_ref().map(|w| w.eth);

        tracing::debug!(input = %input, "Quoting swap");

        // Show the converted amount even when the input fails a later check.
        let parsed = parse_units(input, NATIVE_DECIMALS).ok();
        let preview = parsed
            .map(|eth| calculate_token_amount(eth, pool.tokens_per_eth, pool.token.decimals))
            .transpose()
            .ok()
            .flatten()
            .unwrap_or(U256::ZERO);

        let mut quote = SwapQuote {
            valid: false,
            validation_error: None,
            eth_amount: parsed.map(|v| format_units(v, NATIVE_DECIMALS)).unwrap_or_default(),
            eth_amount_raw: parsed.unwrap_or(U256::ZERO).to_string(),
            token_amount: format_fixed(preview, pool.token.decimals, 6),
            token_amount_raw: preview.to_string(),
            token_symbol: pool.token.symbol.clone(),
            tokens_per_eth: pool.tokens_per_eth.to_string(),
            pool_token_liquidity: format_units(pool.token_liquidity, pool.token.decimals),
            min_eth: self.limits.min_display(),
            max_eth: self.limits.max_display(),
            gas_limit: None,
            gas_price: None,
            gas_cost_eth: None,
        };

        let eth_amount = match validate_swap_amount(input, &self.limits, eth_balance, pool) {
            Ok((eth_amount, _)) => eth_amount,
            Err(e) => {
                quote.validation_error = Some(e.to_string());
                return Ok(quote);
            }
        };

        if self.gateway.wallet_address().is_some() {
            match self.gateway.estimate_swap(eth_amount).await {
                Ok(gas) => {
                    quote.gas_limit = Some(gas.gas_limit.to_string());
                    quote.gas_price = Some(gas.gas_price.to_string());
                    quote.gas_cost_eth = Some(format_units(gas.max_cost_wei(), NATIVE_DECIMALS));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Gas estimation failed for quote");
                    quote.validation_error = Some(e.to_string());
                    return Ok(quote);
                }
            }
        }

        quote.valid = true;
        Ok(quote)
    }

    /// Largest ETH amount the connected wallet can swap.
    pub async fn max_swap(&self) -> Result<MaxSwapAmount> {
        let owner = self.gateway.wallet_address().ok_or(AppError::WalletNotConnected)?;

        let state = self.market.current_or_refresh().await?;
        let balances = match state.wallet {
            Some(balances) => balances,
            None => self.gateway.wallet_balances(owner).await?,
        };

        let max = max_swap_amount(balances.eth, &self.limits);

        Ok(MaxSwapAmount {
            eth_amount: format_units(max, NATIVE_DECIMALS),
            eth_amount_raw: max.to_string(),
            gas_reserve: format_units(GAS_RESERVE_WEI, NATIVE_DECIMALS),
            limit: self.limits.max_display(),
        })
    }
}
