//! Invite / Escrow Redemption
//!
//! Implements the invite payment flow: a sender escrows funds under a
//! one-time key, shares it as a short link, and the recipient redeems the
//! link to pull the whole balance (minus fee) into their own account.
//!
//! # State Machine
//!
//! ```text
//! IDLE → RESOLVING_ACCOUNT → CHECKING_BALANCE → TRANSFERRING → SUCCEEDED
//!              ↓                    ↓                 ↓
//!   FAILED(ACCOUNT_CREATION) FAILED(EMPTY_BALANCE) FAILED(TRANSFER)
//! ```
//!
//! # Invariants
//!
//! 1. **One terminal outcome**: every attempt ends in exactly one of
//!    SUCCEEDED or FAILED(reason)
//! 2. **No automatic retries**: a failed attempt is re-initiated by the
//!    caller with the same key
//! 3. **Safe re-try**: the escrow balance is re-read before every
//!    transfer, so partial progress is always recoverable
//! 4. **Idempotent submission**: transfers carry a per-attempt request id
//!    the node deduplicates on

pub mod api;
pub mod error;
pub mod link;
pub mod orchestrator;
pub mod shortener;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use api::{ApiState, router};
pub use error::InviteError;
pub use link::{extract_key, payload_url};
pub use orchestrator::RedemptionOrchestrator;
#[cfg(feature = "mock-api")]
pub use shortener::MockShortener;
pub use shortener::{DynamicLinkClient, LinkServiceConfig, LinkShortener};
pub use state::{FailureReason, RedemptionState};
pub use types::{InviteLink, MovedFunds, RedemptionOutcome};
