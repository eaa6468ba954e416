//! Wallet Node Ledger Service
//!
//! Client seam for the external signing/ledger node that holds keys,
//! answers balance queries, estimates fees and submits transfers. The
//! workflow never signs or persists anything itself - everything on-chain
//! is delegated through [`LedgerService`].
//!
//! Implementations:
//! - [`NodeRpcLedger`] - JSON-RPC 2.0 client for a real wallet node
//! - [`MockLedger`] - in-process double for dev/test (`mock-api` feature)

pub mod error;
#[cfg(feature = "mock-api")]
pub mod mock;
pub mod rpc;

// Re-exports for convenience
pub use error::LedgerError;
#[cfg(feature = "mock-api")]
pub use mock::MockLedger;
pub use rpc::{NodeRpcConfig, NodeRpcLedger};

use async_trait::async_trait;

use crate::core_types::{Address, Amount, RedemptionId, RedemptionKey, TxHash};
use crate::fee::FeeEstimate;
use crate::token::TokenId;

/// Handle to an account the node has unlocked for signing.
///
/// Only conceptual on our side: the node keeps the session, we keep the
/// derived address. Recomputed on every redemption attempt, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountHandle {
    pub address: Address,
}

impl AccountHandle {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

/// Receipt for a confirmed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// false means the transaction was mined but reverted
    pub status: bool,
}

/// Ledger service contract.
///
/// `submit_transfer` MUST be idempotent on the node side via `req_id`:
/// re-submitting with the same id returns the original receipt instead of
/// moving funds twice.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Service name for logging
    fn name(&self) -> &'static str;

    /// Derive and unlock the account controlled by `key`
    async fn unlock_account(&self, key: &RedemptionKey) -> Result<AccountHandle, LedgerError>;

    /// Query the account's balance for `token`, in wei
    async fn token_balance(
        &self,
        account: &AccountHandle,
        token: TokenId,
    ) -> Result<Amount, LedgerError>;

    /// Estimate the fee for transferring `amount` of `token` to `to`
    async fn estimate_fee(
        &self,
        from: &AccountHandle,
        to: Address,
        token: TokenId,
        amount: Amount,
    ) -> Result<FeeEstimate, LedgerError>;

    /// Submit a transfer and wait for its receipt
    async fn submit_transfer(
        &self,
        req_id: RedemptionId,
        from: &AccountHandle,
        to: Address,
        token: TokenId,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError>;
}
