//! Redemption FSM State Definitions
//!
//! State ids are stable numeric values for logs and API payloads.
//! Terminal states: SUCCEEDED (40), FAILED (-10).

use std::fmt;

/// Redemption FSM States
///
/// One redemption attempt walks Idle → ResolvingAccount → CheckingBalance →
/// Transferring and ends in exactly one terminal state. There are no
/// automatic retries: a failed attempt is re-initiated by the caller with
/// the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum RedemptionState {
    /// No attempt in progress
    Idle = 0,

    /// Unlocking the temporary account from the redemption key
    ResolvingAccount = 10,

    /// Querying the temporary account's token balance
    CheckingBalance = 20,

    /// Fee estimated, transfer submitted, awaiting receipt
    Transferring = 30,

    /// Terminal: funds moved to the redeemer's account
    Succeeded = 40,

    /// Terminal: attempt failed (reason carried in the outcome)
    Failed = -10,
}

impl RedemptionState {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RedemptionState::Succeeded | RedemptionState::Failed)
    }

    /// Get the numeric state ID
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from a numeric state ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(RedemptionState::Idle),
            10 => Some(RedemptionState::ResolvingAccount),
            20 => Some(RedemptionState::CheckingBalance),
            30 => Some(RedemptionState::Transferring),
            40 => Some(RedemptionState::Succeeded),
            -10 => Some(RedemptionState::Failed),
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionState::Idle => "IDLE",
            RedemptionState::ResolvingAccount => "RESOLVING_ACCOUNT",
            RedemptionState::CheckingBalance => "CHECKING_BALANCE",
            RedemptionState::Transferring => "TRANSFERRING",
            RedemptionState::Succeeded => "SUCCEEDED",
            RedemptionState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RedemptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for RedemptionState {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        RedemptionState::from_id(value).ok_or(())
    }
}

/// Why a redemption attempt failed.
///
/// Exactly one reason per failed attempt; each maps to a distinct
/// user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The temporary account could not be derived/unlocked, or its balance
    /// could not be queried
    AccountCreationFailed,
    /// The temporary account holds nothing - the key was already redeemed
    /// or never funded
    EmptyBalance,
    /// Fee estimation or the transfer itself failed
    TransferFailed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AccountCreationFailed => "ACCOUNT_CREATION_FAILED",
            FailureReason::EmptyBalance => "EMPTY_BALANCE",
            FailureReason::TransferFailed => "TRANSFER_FAILED",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RedemptionState::Succeeded.is_terminal());
        assert!(RedemptionState::Failed.is_terminal());

        assert!(!RedemptionState::Idle.is_terminal());
        assert!(!RedemptionState::ResolvingAccount.is_terminal());
        assert!(!RedemptionState::CheckingBalance.is_terminal());
        assert!(!RedemptionState::Transferring.is_terminal());
    }

    #[test]
    fn test_state_id_roundtrip() {
        let states = [
            RedemptionState::Idle,
            RedemptionState::ResolvingAccount,
            RedemptionState::CheckingBalance,
            RedemptionState::Transferring,
            RedemptionState::Succeeded,
            RedemptionState::Failed,
        ];

        for state in states {
            let id = state.id();
            let recovered = RedemptionState::from_id(id).unwrap();
            assert_eq!(state, recovered);
        }
    }

    #[test]
    fn test_invalid_state_id() {
        assert!(RedemptionState::from_id(999).is_none());
        assert!(RedemptionState::from_id(-999).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(RedemptionState::Idle.to_string(), "IDLE");
        assert_eq!(RedemptionState::Succeeded.to_string(), "SUCCEEDED");
        assert_eq!(FailureReason::EmptyBalance.to_string(), "EMPTY_BALANCE");
    }
}
