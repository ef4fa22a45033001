//! Pool and wallet balance polling.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{
    error::{AppError, Result},
    ethereum::SwapGateway,
    services::debounce::{DebounceTrigger, Debouncer},
    types::{PoolSnapshot, WalletBalances},
};

/// Get current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Latest known pool and wallet state.
#[derive(Debug, Clone, Default)]
pub struct MarketState {
    /// Last successful pool read.
    pub pool: Option<PoolSnapshot>,
    /// Last successful wallet read (connected wallets only).
    pub wallet: Option<WalletBalances>,
    /// Unix timestamp of the last successful pool read.
    pub updated_at: Option<u64>,
    /// Error from the most recent refresh, cleared on success.
    pub last_error: Option<String>,
}

/// Keeps [`MarketState`] current.
///
/// A background task re-reads the pool and wallet on every poll interval and
/// whenever a refresh is requested; bursts of requests inside the debounce
/// window collapse into one read. A failed read keeps the previous values.
pub struct MarketWatcher {
    gateway: Arc<dyn SwapGateway>,
    poll_interval: Duration,
    state: watch::Sender<MarketState>,
    trigger: DebounceTrigger,
    debouncer: Mutex<Option<Debouncer>>,
}

impl MarketWatcher {
    pub fn new(gateway: Arc<dyn SwapGateway>, poll_interval: Duration, debounce: Duration) -> Self {
        let (state, _) = watch::channel(MarketState::default());
        let (trigger, debouncer) = Debouncer::new(debounce);

        Self { gateway, poll_interval, state, trigger, debouncer: Mutex::new(Some(debouncer)) }
    }

    /// Spawn the polling task. Returns `None` if it is already running.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let debouncer = self.debouncer.lock().ok().and_then(|mut slot| slot.take());
        let Some(mut debouncer) = debouncer else {
            tracing::warn!("Market watcher already started");
            return None;
        };

        let watcher = Arc::clone(self);
        tracing::info!(
            poll_interval_ms = watcher.poll_interval.as_millis() as u64,
            debounce_ms = debouncer.quiet().as_millis() as u64,
            "Starting market watcher"
        );

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(watcher.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let _ = watcher.refresh_now().await;
                    }
                    coalesced = debouncer.next() => {
                        let Some(count) = coalesced else { break };
                        tracing::debug!(requests = count, "Running requested market refresh");
                        let _ = watcher.refresh_now().await;
                        ticker.reset();
                    }
                }
            }

            tracing::debug!("Market watcher stopped");
        }))
    }

    /// Ask the background task for a refresh (debounced).
    pub fn request_refresh(&self) {
        self.trigger.trigger();
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<MarketState> {
        self.state.subscribe()
    }

    /// Latest state without touching the network.
    pub fn current(&self) -> MarketState {
        self.state.borrow().clone()
    }

    /// Read pool and wallet now and publish the result.
    ///
    /// Fails when the pool could not be read; a failed wallet read is
    /// recorded in `last_error` but keeps the previous balances.
    pub async fn refresh_now(&self) -> Result<MarketState> {
        let (pool, _) = self.refresh().await;
        pool.map(|()| self.current())
    }

    /// Like [`refresh_now`](Self::refresh_now), but a failed wallet read is an
    /// error too. Writes validate against these balances.
    pub async fn refresh_for_write(&self) -> Result<MarketState> {
        let (pool, wallet) = self.refresh().await;
        pool?;
        wallet?;
        Ok(self.current())
    }

    async fn refresh(&self) -> (Result<()>, Result<()>) {
        let wallet_read = async {
            match self.gateway.wallet_address() {
                Some(owner) => self.gateway.wallet_balances(owner).await.map(Some),
                None => Ok(None),
            }
        };
        let (pool, wallet) = tokio::join!(self.gateway.pool_snapshot(), wallet_read);

        let mut outcome = (Ok(()), Ok(()));
        self.state.send_modify(|state| {
            let mut errors = Vec::new();

            match pool {
                Ok(snapshot) => {
                    state.pool = Some(snapshot);
                    state.updated_at = Some(current_timestamp());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Pool refresh failed");
                    errors.push(e.to_string());
                    outcome.0 = Err(e);
                }
            }

            match wallet {
                Ok(Some(balances)) => state.wallet = Some(balances),
                Ok(None) => state.wallet = None,
                Err(e) => {
                    tracing::warn!(error = %e, "Wallet balance refresh failed");
                    errors.push(e.to_string());
                    outcome.1 = Err(e);
                }
            }

            state.last_error = (!errors.is_empty()).then(|| errors.join("; "));
        });

        outcome
    }

    /// Latest state, reading the chain first if the pool was never read.
    pub async fn current_or_refresh(&self) -> Result<MarketState> {
        let state = self.current();
        if state.pool.is_some() {
            return Ok(state);
        }
        self.refresh_now().await
    }
}

impl MarketState {
    /// Pool snapshot or an RPC error describing why it is missing.
    pub fn require_pool(&self) -> Result<&PoolSnapshot> {
        self.pool.as_ref().ok_or_else(|| {
            AppError::Rpc(
                self.last_error.clone().unwrap_or_else(|| "Pool state not loaded yet".to_string()),
            )
        })
    }
}
