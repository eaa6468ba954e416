//! Invite Error Types
//!
//! One taxonomy for the whole invite flow: link encoding/decoding,
//! invite creation and redemption. Error codes feed the API envelope.

use thiserror::Error;

use super::state::FailureReason;
use crate::money::MoneyError;

/// Invite flow error types
#[derive(Error, Debug, Clone)]
pub enum InviteError {
    // === Link Codec Errors ===
    #[error("Invite link could not be generated: {0}")]
    Encoding(String),

    #[error("Invite link is malformed: {0}")]
    MalformedLink(String),

    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Amount precision exceeds token limit")]
    PrecisionOverflow,

    #[error("Amount would cause overflow")]
    Overflow,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    // === Redemption Errors ===
    #[error("Temporary account could not be created or unlocked: {0}")]
    AccountCreation(String),

    #[error("Invite holds no funds (already redeemed or never funded)")]
    EmptyBalance,

    #[error("Transfer failed: {0}")]
    Transfer(String),

    // === System Errors ===
    #[error("Internal system error: {0}")]
    System(String),
}

impl InviteError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            InviteError::Encoding(_) => "ENCODING_FAILED",
            InviteError::MalformedLink(_) => "MALFORMED_LINK",
            InviteError::InvalidAmount => "INVALID_AMOUNT",
            InviteError::PrecisionOverflow => "PRECISION_OVERFLOW",
            InviteError::Overflow => "OVERFLOW",
            InviteError::InvalidAddress(_) => "INVALID_ADDRESS",
            InviteError::UnknownToken(_) => "UNKNOWN_TOKEN",
            InviteError::AccountCreation(_) => "ACCOUNT_CREATION_FAILED",
            InviteError::EmptyBalance => "EMPTY_BALANCE",
            InviteError::Transfer(_) => "TRANSFER_FAILED",
            InviteError::System(_) => "SYSTEM_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            InviteError::MalformedLink(_)
            | InviteError::InvalidAmount
            | InviteError::PrecisionOverflow
            | InviteError::Overflow
            | InviteError::InvalidAddress(_)
            | InviteError::UnknownToken(_) => 400,
            InviteError::EmptyBalance | InviteError::AccountCreation(_) => 422,
            InviteError::Encoding(_) | InviteError::Transfer(_) => 502,
            InviteError::System(_) => 500,
        }
    }

    /// Map to the terminal failure reason a redemption attempt reports.
    ///
    /// Codec and validation errors happen before an attempt starts and have
    /// no reason.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            InviteError::AccountCreation(_) => Some(FailureReason::AccountCreationFailed),
            InviteError::EmptyBalance => Some(FailureReason::EmptyBalance),
            InviteError::Transfer(_) => Some(FailureReason::TransferFailed),
            _ => None,
        }
    }
}

impl From<MoneyError> for InviteError {
    fn from(e: MoneyError) -> Self {
        match e {
            MoneyError::PrecisionOverflow { .. } => InviteError::PrecisionOverflow,
            MoneyError::Overflow => InviteError::Overflow,
            MoneyError::InvalidAmount | MoneyError::InvalidFormat(_) => InviteError::InvalidAmount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(InviteError::EmptyBalance.code(), "EMPTY_BALANCE");
        assert_eq!(
            InviteError::AccountCreation("boom".into()).code(),
            "ACCOUNT_CREATION_FAILED"
        );
        assert_eq!(InviteError::MalformedLink("x".into()).code(), "MALFORMED_LINK");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(InviteError::MalformedLink("x".into()).http_status(), 400);
        assert_eq!(InviteError::EmptyBalance.http_status(), 422);
        assert_eq!(InviteError::Encoding("down".into()).http_status(), 502);
        assert_eq!(InviteError::System("x".into()).http_status(), 500);
    }

    #[test]
    fn test_failure_reason_mapping() {
        assert_eq!(
            InviteError::EmptyBalance.failure_reason(),
            Some(FailureReason::EmptyBalance)
        );
        assert_eq!(
            InviteError::Transfer("revert".into()).failure_reason(),
            Some(FailureReason::TransferFailed)
        );
        assert_eq!(InviteError::InvalidAmount.failure_reason(), None);
    }

    #[test]
    fn test_money_error_conversion() {
        let err: InviteError = MoneyError::Overflow.into();
        assert!(matches!(err, InviteError::Overflow));
        let err: InviteError = MoneyError::InvalidFormat("x".into()).into();
        assert!(matches!(err, InviteError::InvalidAmount));
    }
}
