//! Core types used throughout the system
//!
//! Fundamental wallet primitives shared by all modules: account addresses,
//! one-time redemption keys and transaction hashes. All of them travel as
//! `0x`-prefixed hex strings at the API and RPC boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Token amount in the smallest on-chain unit (wei, 10^-18).
///
/// # Constraints:
/// - **u128**: 18-decimal tokens overflow u64 above ~18.4 tokens
/// - **Unsigned**: balances and transfer amounts are never negative
pub type Amount = u128;

/// Hex decoding errors for addresses, keys and hashes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexParseError {
    #[error("Missing 0x prefix")]
    MissingPrefix,

    #[error("Expected {expected} hex characters, got {got}")]
    BadLength { expected: usize, got: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexParseError> {
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(HexParseError::MissingPrefix)?;

    if body.len() != N * 2 {
        return Err(HexParseError::BadLength {
            expected: N * 2,
            got: body.len(),
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(body, &mut out).map_err(|e| HexParseError::InvalidHex(e.to_string()))?;
    Ok(out)
}

// ============================================================================
// Address
// ============================================================================

/// Account address - 20 bytes, displayed as lowercase `0x…` hex.
///
/// Used both for real (destination) accounts and for the temporary accounts
/// derived from redemption keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// RedemptionKey
// ============================================================================

/// One-time redemption key - 32 bytes of secret key material.
///
/// Controls a pre-funded temporary account and is embedded in invite links
/// as `0x…` hex. Never logged or serialized in full: `Debug` and `Display`
/// are redacted, and the hex form must be requested explicitly via
/// [`RedemptionKey::to_hex`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RedemptionKey([u8; 32]);

impl RedemptionKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh key from the OS RNG
    pub fn generate<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full hex form for link encoding and node RPC. Handle with care.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RedemptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First two bytes are enough to correlate log lines
        write!(f, "RedemptionKey(0x{:02x}{:02x}…)", self.0[0], self.0[1])
    }
}

impl fmt::Display for RedemptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for RedemptionKey {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

// ============================================================================
// RedemptionId
// ============================================================================

/// Redemption attempt ID - ULID-based unique identifier.
///
/// Generated once per attempt; threaded through logs and passed to the node
/// as the idempotency key for transfer submission. ULIDs are monotonic,
/// sortable and need no coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RedemptionId(ulid::Ulid);

impl RedemptionId {
    /// Generate a new unique RedemptionId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for RedemptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RedemptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RedemptionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

// ============================================================================
// TxHash
// ============================================================================

/// Transaction hash - 32 bytes, displayed as `0x…` hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
