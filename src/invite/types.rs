//! Invite Core Types

use std::fmt;

use super::state::{FailureReason, RedemptionState};
use crate::core_types::{Address, Amount, RedemptionId, RedemptionKey};
use crate::ledger::TransferReceipt;

/// A generated invite: one-time key, the escrow account it controls, and
/// the shareable links.
///
/// Immutable once generated. Implicitly invalidated when the escrow
/// account's balance reaches zero.
#[derive(Clone)]
pub struct InviteLink {
    /// One-time key embedded in the payload URL
    pub key: RedemptionKey,
    /// Temporary account funded with the invite amount
    pub escrow_address: Address,
    /// Long URL carrying the key - as sensitive as the key itself
    pub payload_url: String,
    /// Shareable short URL from the link service
    pub short_url: String,
    pub app_store_id: String,
    pub bundle_id: String,
}

impl fmt::Debug for InviteLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // payload_url embeds the key - keep it out of logs
        f.debug_struct("InviteLink")
            .field("key", &self.key)
            .field("escrow_address", &self.escrow_address)
            .field("short_url", &self.short_url)
            .finish_non_exhaustive()
    }
}

/// What a completed fund move looked like
#[derive(Debug, Clone, Copy)]
pub struct MovedFunds {
    pub receipt: TransferReceipt,
    /// Net amount delivered to the destination (balance - fee)
    pub transferred: Amount,
    /// Fee paid out of the escrow balance
    pub fee: Amount,
}

/// Terminal outcome of one redemption attempt.
///
/// Exactly one of these is produced per attempt. `Succeeded` carries the
/// receipt and destination so the caller can refresh the redeemer's
/// balance view.
#[derive(Debug, Clone)]
pub enum RedemptionOutcome {
    Succeeded {
        id: RedemptionId,
        destination: Address,
        receipt: TransferReceipt,
        /// Net amount the destination received
        transferred: Amount,
        /// Fee deducted from the escrow balance
        fee: Amount,
    },
    Failed {
        id: RedemptionId,
        reason: FailureReason,
        /// Operator-facing detail; user-facing text comes from `reason`
        message: String,
    },
}

impl RedemptionOutcome {
    pub fn id(&self) -> RedemptionId {
        match self {
            RedemptionOutcome::Succeeded { id, .. } => *id,
            RedemptionOutcome::Failed { id, .. } => *id,
        }
    }

    /// Terminal FSM state this outcome represents
    pub fn state(&self) -> RedemptionState {
        match self {
            RedemptionOutcome::Succeeded { .. } => RedemptionState::Succeeded,
            RedemptionOutcome::Failed { .. } => RedemptionState::Failed,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, RedemptionOutcome::Succeeded { .. })
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            RedemptionOutcome::Succeeded { .. } => None,
            RedemptionOutcome::Failed { reason, .. } => Some(*reason),
        }
    }
}
