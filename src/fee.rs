//! Fee estimation types and net-amount math
//!
//! Fees are computed by the wallet node per transfer attempt and never
//! cached; this module only defines the estimate shape and the checked
//! arithmetic for "move everything minus the fee".

use crate::core_types::Amount;
use crate::token::TokenId;

/// Fee estimate for a single transfer attempt.
///
/// `fee` is the total cost (`gas * gas_price`) in wei of the fee token.
/// Computed fresh per attempt - a stale estimate on a congested chain is
/// how transfers revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Total fee in wei
    pub fee: Amount,
    /// Gas units the transfer is expected to consume
    pub gas: u64,
    /// Gas price in wei
    pub gas_price: Amount,
    /// Token the fee is denominated in
    pub token: TokenId,
}

impl FeeEstimate {
    /// Consistency check: fee should equal gas * gas_price when the node
    /// reports all three
    pub fn is_consistent(&self) -> bool {
        (self.gas as u128).checked_mul(self.gas_price) == Some(self.fee)
    }
}

/// Net amount for a drain-the-account transfer: `balance - fee`.
///
/// Returns `None` when the fee consumes the whole balance (net would be
/// zero or negative) - submitting such a transfer only burns gas.
#[inline]
pub fn net_transfer_amount(balance: Amount, fee: Amount) -> Option<Amount> {
    match balance.checked_sub(fee) {
        Some(0) | None => None,
        some => some,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEI: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_net_transfer_amount() {
        // 10 cUSD balance, 0.01 cUSD fee -> 9.99 cUSD
        let balance = 10 * WEI;
        let fee = WEI / 100;
        assert_eq!(net_transfer_amount(balance, fee), Some(balance - fee));
    }

    #[test]
    fn test_net_transfer_amount_fee_eats_balance() {
        assert_eq!(net_transfer_amount(100, 100), None);
        assert_eq!(net_transfer_amount(99, 100), None);
        assert_eq!(net_transfer_amount(0, 1), None);
    }

    #[test]
    fn test_fee_estimate_consistency() {
        let estimate = FeeEstimate {
            fee: 200_000u128 * 5_000_000_000u128,
            gas: 200_000,
            gas_price: 5_000_000_000,
            token: TokenId::StableDollar,
        };
        assert!(estimate.is_consistent());

        let off = FeeEstimate { fee: 1, ..estimate };
        assert!(!off.is_consistent());
    }
}
