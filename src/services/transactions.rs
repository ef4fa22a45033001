//! Tracking of submitted transactions.

use std::collections::hash_map::Entry as Slot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, Result},
    ethereum::SwapGateway,
    services::market::{current_timestamp, MarketWatcher},
    types::{
        explorer_tx_url, TransactionEvent, TransactionKind, TransactionRecord, TransactionState,
    },
};

struct Entry {
    seq: u64,
    record: TransactionRecord,
}

/// In-memory transaction lifecycle store.
///
/// Every state change goes through [`TransactionState::apply`], so a record
/// can only move along the allowed lifecycle.
pub struct TransactionTracker {
    explorer_url: String,
    records: RwLock<HashMap<TxHash, Entry>>,
    seq: AtomicU64,
}

impl TransactionTracker {
    pub fn new(explorer_url: impl Into<String>) -> Self {
        Self { explorer_url: explorer_url.into(), records: RwLock::new(HashMap::new()), seq: AtomicU64::new(0) }
    }

    /// Start tracking a broadcast transaction as pending.
    pub async fn submit(
        &self,
        hash: TxHash,
        kind: TransactionKind,
        summary: impl Into<String>,
    ) -> Result<TransactionRecord> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get(&hash) {
            return Err(AppError::InvalidTransition {
                from: existing.record.state.to_string(),
                event: TransactionEvent::Submitted.to_string(),
            });
        }

        let state = TransactionState::Idle.apply(TransactionEvent::Submitted)?;
        let hash_str = format!("{hash:?}");
        let record = TransactionRecord {
            explorer_url: explorer_tx_url(&self.explorer_url, &hash_str),
            hash: hash_str,
            kind,
            state,
            summary: summary.into(),
            error: None,
            submitted_at: current_timestamp(),
            finalized_at: None,
        };

        tracing::info!(tx_hash = %hash, kind = ?kind, summary = %record.summary, "Tracking transaction");

        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        records.insert(hash, Entry { seq, record: record.clone() });
        Ok(record)
    }

    /// Mark a pending transaction as mined successfully.
    pub async fn confirm(&self, hash: TxHash) -> Result<TransactionRecord> {
        self.transition(hash, TransactionEvent::Confirmed, None).await
    }

    /// Mark a pending transaction as failed.
    pub async fn fail(&self, hash: TxHash, reason: impl Into<String>) -> Result<TransactionRecord> {
        self.transition(hash, TransactionEvent::Failed, Some(reason.into())).await
    }

    /// Acknowledge a finished transaction and stop tracking it.
    ///
    /// Pending transactions cannot be dismissed.
    pub async fn dismiss(&self, hash: TxHash) -> Result<TransactionRecord> {
        let mut records = self.records.write().await;
        let Slot::Occupied(slot) = records.entry(hash) else {
            return Err(AppError::TransactionNotFound(format!("{hash:?}")));
        };

        let state = slot.get().record.state.apply(TransactionEvent::Dismissed)?;
        let mut record = slot.remove().record;
        record.state = state;

        tracing::debug!(tx_hash = %hash, "Transaction dismissed");
        Ok(record)
    }

    pub async fn get(&self, hash: TxHash) -> Result<TransactionRecord> {
        self.records
            .read()
            .await
            .get(&hash)
            .map(|e| e.record.clone())
            .ok_or_else(|| AppError::TransactionNotFound(format!("{hash:?}")))
    }

    /// Most recent transactions first.
    pub async fn recent(&self, limit: usize) -> Vec<TransactionRecord> {
        let records = self.records.read().await;
        let mut entries: Vec<&Entry> = records.values().collect();
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        entries.into_iter().take(limit).map(|e| e.record.clone()).collect()
    }

    /// Wait for the receipt and settle the record.
    ///
    /// A reverted receipt or a receipt that never arrives fails the record.
    /// Either way a market refresh is requested.
    pub async fn finalize(
        &self,
        gateway: &dyn SwapGateway,
        market: &MarketWatcher,
        hash: TxHash,
        timeout: Duration,
    ) -> Result<TransactionRecord> {
        let outcome = gateway.wait_for_receipt(hash, timeout).await;

        let record = match outcome {
            Ok(true) => {
                tracing::info!(tx_hash = %hash, "Transaction confirmed");
                self.confirm(hash).await
            }
            Ok(false) => {
                tracing::warn!(tx_hash = %hash, "Transaction reverted");
                self.fail(hash, "Transaction reverted").await
            }
            Err(e) => {
                tracing::warn!(tx_hash = %hash, error = %e, "Transaction not confirmed");
                self.fail(hash, e.to_string()).await
            }
        };

        market.request_refresh();
        record
    }

    /// Settle `record` inline when `wait`, otherwise in a background task.
    ///
    /// Returns the settled record, or the pending one when not waiting.
    pub async fn follow(
        self: &Arc<Self>,
        gateway: Arc<dyn SwapGateway>,
        market: Arc<MarketWatcher>,
        hash: TxHash,
        timeout: Duration,
        wait: bool,
    ) -> Result<TransactionRecord> {
        if wait {
            return self.finalize(gateway.as_ref(), &market, hash, timeout).await;
        }

        let pending = self.get(hash).await?;
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = tracker.finalize(gateway.as_ref(), &market, hash, timeout).await {
                tracing::error!(tx_hash = %hash, error = %e, "Failed to settle transaction");
            }
        });

        Ok(pending)
    }

    async fn transition(
        &self,
        hash: TxHash,
        event: TransactionEvent,
        error: Option<String>,
    ) -> Result<TransactionRecord> {
        let mut records = self.records.write().await;
        let entry =
            records.get_mut(&hash).ok_or_else(|| AppError::TransactionNotFound(format!("{hash:?}")))?;

        entry.record.state = entry.record.state.apply(event)?;
        entry.record.error = error;
        entry.record.finalized_at = Some(current_timestamp());

        Ok(entry.record.clone())
    }
}
