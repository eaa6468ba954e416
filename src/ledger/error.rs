use thiserror::Error;

/// Errors from the wallet node ledger service
#[derive(Debug, Error, Clone)]
pub enum LedgerError {
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Account could not be unlocked: {0}")]
    Unlock(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Unknown token on node: {0}")]
    UnknownToken(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// True when the node answered and explicitly refused; false for
    /// transport-level failures where the operation outcome is unknown
    pub fn is_explicit(&self) -> bool {
        !matches!(self, LedgerError::RpcConnection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_vs_unknown() {
        assert!(!LedgerError::RpcConnection("timeout".into()).is_explicit());
        assert!(
            LedgerError::Rpc {
                code: -32000,
                message: "insufficient funds".into()
            }
            .is_explicit()
        );
        assert!(LedgerError::Reverted("out of gas".into()).is_explicit());
    }

    #[test]
    fn test_display() {
        let err = LedgerError::Rpc {
            code: -32601,
            message: "method not found".into(),
        };
        assert_eq!(err.to_string(), "RPC error -32601: method not found");
    }
}
