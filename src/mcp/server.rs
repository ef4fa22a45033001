//! MCP server implementation.

use std::sync::Arc;

use alloy::primitives::TxHash;
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{ChainGateway, EthereumClient, SwapGateway, WalletConnection},
    services::{
        BalanceService, LiquidityService, MarketWatcher, QuoteService, SwapService,
        TransactionTracker,
    },
};

/// Default number of transactions returned by `list_transactions`.
const DEFAULT_LIST_LIMIT: usize = 10;

/// Upper bound for `list_transactions`.
const MAX_LIST_LIMIT: usize = 100;

/// FluffySwap MCP Server.
///
/// Exposes the swap client as tools: wallet and pool queries, quotes, swaps,
/// liquidity deposits and transaction tracking.
#[derive(Clone)]
pub struct FluffySwapServer {
    balance_service: BalanceService,
    quote_service: QuoteService,
    swap_service: SwapService,
    liquidity_service: LiquidityService,
    tracker: Arc<TransactionTracker>,
    market: Arc<MarketWatcher>,
    tool_router: ToolRouter<Self>,
}

impl FluffySwapServer {
    /// Create a new FluffySwap MCP Server.
    ///
    /// Note: This uses lazy initialization - no network calls are made during
    /// server startup. The node is first contacted when a tool is invoked or
    /// the market watcher is started.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing FluffySwap MCP Server");

        let wallet = WalletConnection::from_optional_key(config.private_key.as_deref())?;
        let client = Arc::new(EthereumClient::new(&config.rpc_url, &wallet)?);

        let gateway = Arc::new(ChainGateway::new(
            client,
            wallet,
            config.swap_address,
            config.token_address,
            config.chain_id,
        ));

        let server = Self::with_gateway(gateway, &config);

        tracing::info!(
            swap_contract = %config.swap_address,
            token_contract = %config.token_address,
            chain_id = config.chain_id,
            "FluffySwap MCP Server initialized successfully"
        );

        Ok(server)
    }

    /// Build the server on top of any [`SwapGateway`].
    pub fn with_gateway(gateway: Arc<dyn SwapGateway>, config: &Config) -> Self {
        let market =
            Arc::new(MarketWatcher::new(gateway.clone(), config.poll_interval, config.refresh_debounce));
        let tracker = Arc::new(TransactionTracker::new(config.explorer_url.clone()));

        let balance_service = BalanceService::new(gateway.clone(), market.clone());
        let quote_service = QuoteService::new(gateway.clone(), market.clone(), config.swap_limits);
        let swap_service = SwapService::new(
            gateway.clone(),
            market.clone(),
            tracker.clone(),
            config.swap_limits,
            config.confirmation_timeout,
        );
        let liquidity_service =
            LiquidityService::new(gateway, market.clone(), tracker.clone(), config.confirmation_timeout);

        Self {
            balance_service,
            quote_service,
            swap_service,
            liquidity_service,
            tracker,
            market,
            tool_router: Self::tool_router(),
        }
    }

    /// Start background polling of pool and wallet state.
    pub fn spawn_market_watcher(&self) -> Option<JoinHandle<()>> {
        self.market.start()
    }
}

/// Input parameters for the quote_swap tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct QuoteSwapInput {
    /// ETH amount to swap (human-readable, e.g., "0.5").
    pub eth_amount: String,
}

/// Input parameters for the swap_eth_for_tokens tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SwapEthInput {
    /// ETH amount to swap (human-readable, e.g., "0.5").
    pub eth_amount: String,
    /// Wait for the receipt before returning. Default: false.
    #[serde(default)]
    pub wait_for_confirmation: Option<bool>,
}

/// Input parameters for the add_liquidity tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct AddLiquidityInput {
    /// Token amount to deposit into the pool (human-readable, e.g., "1000").
    pub token_amount: String,
    /// Wait for the receipt before returning. Default: false.
    #[serde(default)]
    pub wait_for_confirmation: Option<bool>,
}

/// Input parameters for tools addressing one transaction.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct TransactionHashInput {
    /// Transaction hash (0x + 64 hex characters).
    pub tx_hash: String,
}

/// Input parameters for the list_transactions tool.
#[derive(Debug, Clone, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListTransactionsInput {
    /// Maximum number of transactions, newest first. Default: 10, max: 100.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parse and validate a transaction hash.
///
/// Accepts `0x` followed by exactly 64 hex characters.
fn parse_tx_hash(s: &str) -> Result<TxHash, McpError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(McpError::invalid_params("Transaction hash cannot be empty", None));
    }

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(McpError::invalid_params(
            format!("Transaction hash must start with '0x': {}", s),
            None,
        ));
    }

    if trimmed.len() != 66 {
        return Err(McpError::invalid_params(
            format!(
                "Transaction hash must be 66 characters (0x + 64 hex chars), got {}: {}",
                trimmed.len(),
                s
            ),
            None,
        ));
    }

    trimmed.parse::<TxHash>().map_err(|e| {
        McpError::invalid_params(format!("Invalid transaction hash '{}': {}", s, e), None)
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl FluffySwapServer {
    /// Connection status and balances of the configured wallet.
    #[tool(description = "Get the connected wallet's address, network, ETH balance and FLUF balance")]
    pub async fn get_wallet_info(&self) -> Result<String, McpError> {
        tracing::info!("get_wallet_info called");

        let info = self.balance_service.wallet_info().await?;
        to_json(&info)
    }

    /// Exchange rate, reserves and liquidity depth of the swap contract.
    #[tool(
        description = "Get the FluffySwap pool: tokens per ETH, FLUF liquidity, ETH reserve and liquidity status"
    )]
    pub async fn get_pool_info(&self) -> Result<String, McpError> {
        tracing::info!("get_pool_info called");

        let info = self.liquidity_service.pool_info().await?;
        to_json(&info)
    }

    /// Quote a swap without sending anything.
    ///
    /// Invalid amounts yield `valid: false` and a `validation_error` rather
    /// than a tool error.
    #[tool(
        description = "Quote how many FLUF tokens an ETH amount buys and check it against swap limits, wallet balance and pool liquidity"
    )]
    pub async fn quote_swap(
        &self,
        Parameters(input): Parameters<QuoteSwapInput>,
    ) -> Result<String, McpError> {
        tracing::info!(eth_amount = %input.eth_amount, "quote_swap called");

        let quote = self.quote_service.quote(&input.eth_amount).await?;
        to_json(&quote)
    }

    #[tool(description = "Get the largest ETH amount the wallet can swap, keeping 0.01 ETH for gas")]
    pub async fn get_max_swap_amount(&self) -> Result<String, McpError> {
        tracing::info!("get_max_swap_amount called");

        let max = self.quote_service.max_swap().await?;
        to_json(&max)
    }

    /// Swap ETH for FLUF at the contract's fixed rate.
    ///
    /// The swap is validated and simulated first; nothing is broadcast when
    /// either step fails.
    #[tool(
        description = "Swap ETH for FLUF tokens. Validates and simulates first, then submits the transaction and tracks it"
    )]
    pub async fn swap_eth_for_tokens(
        &self,
        Parameters(input): Parameters<SwapEthInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            eth_amount = %input.eth_amount,
            wait = ?input.wait_for_confirmation,
            "swap_eth_for_tokens called"
        );

        let wait = input.wait_for_confirmation.unwrap_or(false);
        let record = self.swap_service.swap(&input.eth_amount, wait).await?;
        to_json(&record)
    }

    #[tool(
        description = "Add liquidity by transferring FLUF tokens from the wallet to the swap contract"
    )]
    pub async fn add_liquidity(
        &self,
        Parameters(input): Parameters<AddLiquidityInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_amount = %input.token_amount,
            wait = ?input.wait_for_confirmation,
            "add_liquidity called"
        );

        let wait = input.wait_for_confirmation.unwrap_or(false);
        let record = self.liquidity_service.add_liquidity(&input.token_amount, wait).await?;
        to_json(&record)
    }

    #[tool(description = "Get the status of a transaction submitted by this server")]
    pub async fn get_transaction_status(
        &self,
        Parameters(input): Parameters<TransactionHashInput>,
    ) -> Result<String, McpError> {
        tracing::debug!(tx_hash = %input.tx_hash, "get_transaction_status called");

        let hash = parse_tx_hash(&input.tx_hash)?;
        let record = self.tracker.get(hash).await?;
        to_json(&record)
    }

    #[tool(description = "List transactions submitted by this server, newest first")]
    pub async fn list_transactions(
        &self,
        Parameters(input): Parameters<ListTransactionsInput>,
    ) -> Result<String, McpError> {
        let limit = input.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        tracing::debug!(limit = limit, "list_transactions called");

        let records = self.tracker.recent(limit).await;
        to_json(&records)
    }

    /// Acknowledge a finished transaction, returning it to idle.
    #[tool(
        description = "Dismiss a confirmed or failed transaction. Pending transactions cannot be dismissed"
    )]
    pub async fn dismiss_transaction(
        &self,
        Parameters(input): Parameters<TransactionHashInput>,
    ) -> Result<String, McpError> {
        tracing::info!(tx_hash = %input.tx_hash, "dismiss_transaction called");

        let hash = parse_tx_hash(&input.tx_hash)?;
        let record = self.tracker.dismiss(hash).await?;
        to_json(&record)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for FluffySwapServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fluffyswap-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FluffySwap MCP Server. Swap ETH for FLUF at a fixed rate, add FLUF liquidity, \
                 and track submitted transactions. Quote before swapping."
                    .to_string(),
            ),
        }
    }
}
