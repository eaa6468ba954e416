//! Money Conversion Module
//!
//! Unified conversion between the internal wei representation (`u128`) and
//! the client-facing string/Decimal representation. All conversions MUST go
//! through this module.
//!
//! ## Design Principles
//! 1. Single Source of Truth: the token registry provides all decimal configurations
//! 2. Explicit Error Handling: No silent truncation
//!
//! ## Internal Representation
//! - All amounts are stored as [`Amount`] (`u128`)
//! - The scale factor is `10^decimals` (18 for cUSD/CELO = wei)

use crate::core_types::Amount;
use rust_decimal::prelude::*;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// Parse: Client → Internal (String/Decimal → u128)
// ============================================================================

/// Convert a client amount string to internal wei representation.
///
/// # Errors
/// * `PrecisionOverflow` - input has more decimal places than allowed
/// * `InvalidAmount` - amount is zero or signed
/// * `Overflow` - result would overflow u128
/// * `InvalidFormat` - string format is invalid
pub fn parse_amount(amount_str: &str, decimals: u32) -> Result<Amount, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    // Signs are rejected outright: transfer amounts are always positive
    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let parts: Vec<&str> = amount_str.split('.').collect();
    let (whole, frac) = match parts.len() {
        1 => (parts[0], ""),
        2 => {
            // Strict check: require both sides of the dot to be non-empty.
            // This prevents ambiguous formats like ".5" or "5."
            if parts[0].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if parts[1].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            (parts[0], parts[1])
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    };

    // Precision validation: REJECT if too many decimals (no silent truncation!)
    if frac.len() > decimals as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: decimals,
        });
    }

    let whole_num: u128 = whole.parse::<u128>().map_err(|e| {
        let err_str = e.to_string();
        if err_str.contains("too large") || err_str.contains("overflow") {
            MoneyError::Overflow
        } else {
            MoneyError::InvalidFormat(format!("invalid character in whole part: {}", whole))
        }
    })?;

    let frac_num: u128 = if frac.is_empty() {
        0
    } else {
        let frac_padded = format!("{:0<width$}", frac, width = decimals as usize);
        frac_padded[..decimals as usize]
            .parse::<u128>()
            .map_err(|_| MoneyError::InvalidFormat("invalid fractional part".into()))?
    };

    let multiplier = 10u128.pow(decimals);
    let amount = whole_num
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(frac_num))
        .ok_or(MoneyError::Overflow)?;

    if amount == 0 {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(amount)
}

/// Convert a Decimal to internal wei representation.
///
/// Used at the gateway boundary where `rust_decimal::Decimal` is used for
/// JSON deserialization.
pub fn parse_decimal(decimal: Decimal, decimals: u32) -> Result<Amount, MoneyError> {
    if decimal.is_sign_negative() || decimal.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    if decimal.scale() > decimals {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: decimals,
        });
    }

    // Decimal tops out near 7.9e28, so route through the string form to
    // avoid multiplying into its overflow range for 18-decimal tokens.
    parse_amount(&decimal.normalize().to_string(), decimals)
}

// ============================================================================
// Format: Internal → Client (u128 → String)
// ============================================================================

/// Convert internal wei value to a display string.
///
/// `display_decimals` truncates (never rounds up) and is capped at the
/// token's `decimals`.
pub fn format_amount(value: Amount, decimals: u32, display_decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = value / scale;
    let frac = value % scale;

    let shown = display_decimals.min(decimals) as usize;
    if shown == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, &frac_str[..shown])
}

/// Convert internal wei value to a full-precision string (for RPC payloads)
pub fn format_amount_full(value: Amount, decimals: u32) -> String {
    format_amount(value, decimals, decimals)
}

/// Plain base-10 wei string, the form the node RPC speaks
pub fn to_wei_string(value: Amount) -> String {
    value.to_string()
}

/// Parse a base-10 wei string from the node RPC
pub fn from_wei_string(s: &str) -> Result<Amount, MoneyError> {
    s.trim()
        .parse::<u128>()
        .map_err(|_| MoneyError::InvalidFormat(format!("invalid wei value: {}", s)))
}
