//! escrowlink - Escrow Invite Service
//!
//! Invite-link escrow payments over an external wallet node: a sender
//! escrows funds under a one-time key, the link carries the key, and the
//! recipient redeems it for the full balance minus fee.
//!
//! # Modules
//!
//! - [`core_types`] - Addresses, redemption keys, tx hashes, attempt ids
//! - [`token`] - Token registry (cUSD, CELO)
//! - [`money`] - Strict wei ↔ string/Decimal conversion
//! - [`fee`] - Fee estimates and net-amount math
//! - [`ledger`] - Wallet node client seam (RPC + mock)
//! - [`invite`] - Link codec, shortener, redemption orchestrator, HTTP API
//! - [`config`] - YAML application config
//! - [`logging`] - Tracing subscriber setup

// Core types - must be first!
pub mod core_types;

// Token and money handling
pub mod fee;
pub mod money;
pub mod token;

// External service seams
pub mod ledger;

// Invite flow
pub mod invite;

// App plumbing
pub mod config;
pub mod logging;

// Convenient re-exports at crate root
pub use config::{AppConfig, InviteConfig};
pub use core_types::{Address, Amount, RedemptionId, RedemptionKey, TxHash};
pub use fee::FeeEstimate;
pub use invite::{
    FailureReason, InviteError, InviteLink, RedemptionOrchestrator, RedemptionOutcome,
    RedemptionState,
};
pub use ledger::{AccountHandle, LedgerError, LedgerService, TransferReceipt};
pub use token::TokenId;
