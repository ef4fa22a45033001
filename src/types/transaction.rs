//! Transaction lifecycle types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// Where a submitted transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Nothing in flight, or the outcome was acknowledged.
    #[default]
    Idle,
    /// Broadcast and waiting for a receipt.
    Pending,
    /// Mined with a successful status.
    Success,
    /// Reverted, dropped or timed out.
    Error,
}

/// Input to the transaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    Submitted,
    Confirmed,
    Failed,
    Dismissed,
}

impl TransactionState {
    /// Apply an event, rejecting transitions the lifecycle does not allow.
    pub fn apply(self, event: TransactionEvent) -> Result<Self> {
        use TransactionEvent::*;
        use TransactionState::*;

        match (self, event) {
            (Idle, Submitted) => Ok(Pending),
            (Pending, Confirmed) => Ok(Success),
            (Pending, Failed) => Ok(Error),
            (Success | Error, Dismissed) => Ok(Idle),
            (from, event) => Err(AppError::InvalidTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TransactionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Dismissed => "dismissed",
        };
        f.write_str(s)
    }
}

/// What a tracked transaction does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// `swapEthForTokens` on the swap contract.
    Swap,
    /// Token `transfer` into the swap contract.
    AddLiquidity,
}

/// A tracked transaction as reported to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash (0x-prefixed).
    pub hash: String,
    pub kind: TransactionKind,
    pub state: TransactionState,
    /// What was sent, e.g. "0.5 ETH -> 500 FLUF".
    pub summary: String,
    /// Failure reason when `state` is `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Block explorer link.
    pub explorer_url: String,
    /// Unix timestamp of submission.
    pub submitted_at: u64,
    /// Unix timestamp of confirmation or failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<u64>,
}

/// Explorer link for a transaction hash.
pub fn explorer_tx_url(explorer_base: &str, hash: &str) -> String {
    format!("{}/tx/{}", explorer_base.trim_end_matches('/'), hash)
}
