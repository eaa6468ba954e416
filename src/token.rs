//! Token registry
//!
//! Static configuration for the tokens the invite flow can move: the stable
//! dollar token (cUSD) used for escrowed invite payments, and the native
//! token (CELO) that pays gas. Both use 18 decimals on-chain.

use once_cell::sync::Lazy;

/// Token ID - stable numeric identifier, also used on the node RPC wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TokenId {
    /// Stable dollar token (cUSD)
    StableDollar = 1,
    /// Native token (CELO)
    Native = 2,
}

impl TokenId {
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenId::StableDollar => "cUSD",
            TokenId::Native => "CELO",
        }
    }

    /// Parse a client-facing symbol ("cUSD", "CELO"), case-insensitive
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CUSD" => Some(TokenId::StableDollar),
            "CELO" => Some(TokenId::Native),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Static token configuration
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub id: TokenId,
    pub symbol: &'static str,
    /// On-chain decimals (wei scale)
    pub decimals: u32,
    /// Max decimals accepted from client input
    pub display_decimals: u32,
}

static TOKENS: Lazy<Vec<TokenInfo>> = Lazy::new(|| {
    vec![
        TokenInfo {
            id: TokenId::StableDollar,
            symbol: "cUSD",
            decimals: 18,
            display_decimals: 6,
        },
        TokenInfo {
            id: TokenId::Native,
            symbol: "CELO",
            decimals: 18,
            display_decimals: 6,
        },
    ]
});

/// Look up token configuration by id
pub fn token_info(id: TokenId) -> &'static TokenInfo {
    TOKENS
        .iter()
        .find(|t| t.id == id)
        .expect("token registry covers all TokenId variants")
}
