//! Redemption Orchestrator
//!
//! Drives the redemption FSM: resolve the escrow account, check its
//! balance, move everything (minus fee) to the redeemer. Emits exactly one
//! terminal outcome per attempt and never retries on its own - a failed
//! attempt is re-initiated by the caller with the same key, which is safe
//! because the balance is re-read before every transfer.
//!
//! Also owns the inverse flow: creating an invite by generating a fresh
//! key, funding its escrow account and producing the shareable link.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::InviteError;
use super::link;
use super::shortener::LinkShortener;
use super::state::{FailureReason, RedemptionState};
use super::types::{InviteLink, MovedFunds, RedemptionOutcome};
use crate::config::InviteConfig;
use crate::core_types::{Address, Amount, RedemptionId, RedemptionKey};
use crate::fee::net_transfer_amount;
use crate::ledger::{AccountHandle, LedgerService};
use crate::token::{TokenId, token_info};

/// Redemption Orchestrator - sequences the redemption FSM
pub struct RedemptionOrchestrator {
    ledger: Arc<dyn LedgerService>,
    shortener: Arc<dyn LinkShortener>,
    config: InviteConfig,
}

impl RedemptionOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerService>,
        shortener: Arc<dyn LinkShortener>,
        config: InviteConfig,
    ) -> Self {
        Self {
            ledger,
            shortener,
            config,
        }
    }

    /// Redeem an invite: move the escrow account's whole balance (minus
    /// fee) to `destination`.
    ///
    /// Always produces exactly one terminal outcome; errors along the way
    /// are folded into `Failed(reason)` rather than surfaced as `Err`.
    pub async fn redeem(
        &self,
        key: &RedemptionKey,
        destination: Address,
        token: TokenId,
    ) -> RedemptionOutcome {
        let id = RedemptionId::new();
        info!(req_id = %id, token = %token, destination = %destination, "Redemption started");

        // Idle -> ResolvingAccount
        self.transition(id, RedemptionState::Idle, RedemptionState::ResolvingAccount);
        let escrow = match self.ledger.unlock_account(key).await {
            Ok(handle) => handle,
            Err(e) => {
                return self.fail(
                    id,
                    RedemptionState::ResolvingAccount,
                    FailureReason::AccountCreationFailed,
                    format!("unlock: {}", e),
                );
            }
        };

        // ResolvingAccount -> CheckingBalance
        self.transition(
            id,
            RedemptionState::ResolvingAccount,
            RedemptionState::CheckingBalance,
        );
        let balance = match self.ledger.token_balance(&escrow, token).await {
            Ok(balance) => balance,
            // A failed query is NOT an empty balance: the account never
            // became usable, so report it like a resolution failure
            Err(e) => {
                return self.fail(
                    id,
                    RedemptionState::CheckingBalance,
                    FailureReason::AccountCreationFailed,
                    format!("balance query: {}", e),
                );
            }
        };

        if balance == 0 {
            return self.fail(
                id,
                RedemptionState::CheckingBalance,
                FailureReason::EmptyBalance,
                "escrow balance is zero".to_string(),
            );
        }

        if escrow.address == destination {
            // Refunding the escrow account to itself would only burn fees
            return self.fail(
                id,
                RedemptionState::CheckingBalance,
                FailureReason::TransferFailed,
                "destination is the escrow account itself".to_string(),
            );
        }

        // CheckingBalance -> Transferring
        self.transition(
            id,
            RedemptionState::CheckingBalance,
            RedemptionState::Transferring,
        );
        match self
            .move_all_funds(id, &escrow, destination, token, balance)
            .await
        {
            Ok(moved) => {
                let decimals = token_info(token).decimals;
                info!(
                    req_id = %id,
                    tx = %moved.receipt.transaction_hash,
                    transferred = %crate::money::format_amount_full(moved.transferred, decimals),
                    fee = %crate::money::format_amount_full(moved.fee, decimals),
                    "Redemption succeeded"
                );
                RedemptionOutcome::Succeeded {
                    id,
                    destination,
                    receipt: moved.receipt,
                    transferred: moved.transferred,
                    fee: moved.fee,
                }
            }
            Err(e) => self.fail(
                id,
                RedemptionState::Transferring,
                e.failure_reason().unwrap_or(FailureReason::TransferFailed),
                e.to_string(),
            ),
        }
    }

    /// Move the full `balance` of `token` from the escrow account to
    /// `destination`, net of a freshly estimated fee.
    ///
    /// `balance` must come from a query within the same attempt - stale
    /// balances make the node reject the transfer, they never over-draw.
    pub async fn move_all_funds(
        &self,
        id: RedemptionId,
        escrow: &AccountHandle,
        destination: Address,
        token: TokenId,
        balance: Amount,
    ) -> Result<MovedFunds, InviteError> {
        let estimate = self
            .ledger
            .estimate_fee(escrow, destination, token, balance)
            .await
            .map_err(|e| InviteError::Transfer(format!("fee estimation: {}", e)))?;

        let net = net_transfer_amount(balance, estimate.fee).ok_or_else(|| {
            InviteError::Transfer(format!(
                "fee {} consumes entire balance {}",
                estimate.fee, balance
            ))
        })?;

        debug!(
            req_id = %id,
            balance = balance,
            fee = estimate.fee,
            net = net,
            "Submitting full-balance transfer"
        );

        let receipt = self
            .ledger
            .submit_transfer(id, escrow, destination, token, net)
            .await
            .map_err(|e| InviteError::Transfer(e.to_string()))?;

        if !receipt.status {
            return Err(InviteError::Transfer(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        Ok(MovedFunds {
            receipt,
            transferred: net,
            fee: estimate.fee,
        })
    }

    /// Create an invite: generate a one-time key, fund its escrow account
    /// from `sender`, and produce the shareable short link.
    pub async fn create_invite(
        &self,
        sender: &AccountHandle,
        amount: Amount,
        token: TokenId,
    ) -> Result<InviteLink, InviteError> {
        if amount == 0 {
            return Err(InviteError::InvalidAmount);
        }

        let key = RedemptionKey::generate(&mut rand::rngs::OsRng);
        let escrow = self
            .ledger
            .unlock_account(&key)
            .await
            .map_err(|e| InviteError::AccountCreation(e.to_string()))?;

        let funding_id = RedemptionId::new();
        let receipt = self
            .ledger
            .submit_transfer(funding_id, sender, escrow.address, token, amount)
            .await
            .map_err(|e| InviteError::Transfer(format!("escrow funding: {}", e)))?;
        if !receipt.status {
            return Err(InviteError::Transfer(format!(
                "escrow funding transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        info!(
            req_id = %funding_id,
            escrow = %escrow.address,
            tx = %receipt.transaction_hash,
            "Escrow account funded"
        );

        // Funds are escrowed at this point; a shortener failure means the
        // invite cannot be shared, but the key still controls the balance
        link::generate_invite_link(self.shortener.as_ref(), &self.config, &key, escrow.address)
            .await
            .inspect_err(|e| {
                warn!(escrow = %escrow.address, error = %e, "Invite funded but link generation failed");
            })
    }

    fn transition(&self, id: RedemptionId, from: RedemptionState, to: RedemptionState) {
        debug!(req_id = %id, from = %from, to = %to, "State transition");
    }

    fn fail(
        &self,
        id: RedemptionId,
        at: RedemptionState,
        reason: FailureReason,
        message: String,
    ) -> RedemptionOutcome {
        warn!(
            req_id = %id,
            state = %at,
            reason = %reason,
            error = %message,
            "Redemption failed"
        );
        RedemptionOutcome::Failed {
            id,
            reason,
            message,
        }
    }
}
