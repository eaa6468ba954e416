//! Wallet Node JSON-RPC Client
//!
//! Talks JSON-RPC 2.0 to the wallet node that owns key custody, balance
//! queries, fee estimation and transfer submission. Amounts cross the wire
//! as base-10 wei strings; addresses and keys as `0x…` hex.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::LedgerError;
use super::{AccountHandle, LedgerService, TransferReceipt};
use crate::core_types::{Address, Amount, RedemptionId, RedemptionKey, TxHash};
use crate::fee::FeeEstimate;
use crate::money;
use crate::token::TokenId;

/// Wallet node connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRpcConfig {
    /// Node RPC endpoint, e.g. "http://localhost:8545"
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for NodeRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// JSON-RPC request structure
#[derive(Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Fee estimate as reported by the node
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RpcFeeEstimate {
    fee: String,
    gas: u64,
    gas_price: String,
}

/// Transfer receipt as reported by the node
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    block_number: u64,
    gas_used: u64,
    status: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RpcTransferParams {
    request_id: String,
    from: String,
    to: String,
    token: &'static str,
    amount: String,
}

/// Ledger client backed by a real wallet node
pub struct NodeRpcLedger {
    config: NodeRpcConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl NodeRpcLedger {
    pub fn new(config: NodeRpcConfig) -> Result<Self, LedgerError> {
        info!("Initializing wallet node client at {}", config.url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LedgerError::RpcConnection(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Make a JSON-RPC call to the node
    async fn call<P: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<T, LedgerError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::RpcConnection(format!("{}: {}", method, e)))?;

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| LedgerError::Parse(format!("{}: {}", method, e)))?;

        if let Some(error) = rpc_response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| LedgerError::Parse(format!("{}: empty result", method)))
    }
}

#[async_trait]
impl LedgerService for NodeRpcLedger {
    fn name(&self) -> &'static str {
        "node-rpc"
    }

    async fn unlock_account(&self, key: &RedemptionKey) -> Result<AccountHandle, LedgerError> {
        let address_hex: String = self
            .call("wallet_unlockAccount", [key.to_hex()])
            .await
            .map_err(|e| match e {
                // Node answered but refused the key
                LedgerError::Rpc { code, message } => {
                    LedgerError::Unlock(format!("{} ({})", message, code))
                }
                other => other,
            })?;

        let address = Address::from_str(&address_hex)
            .map_err(|e| LedgerError::Parse(format!("unlock address: {}", e)))?;

        debug!(address = %address, "Unlocked account");
        Ok(AccountHandle::new(address))
    }

    async fn token_balance(
        &self,
        account: &AccountHandle,
        token: TokenId,
    ) -> Result<Amount, LedgerError> {
        let raw: String = self
            .call(
                "wallet_getTokenBalance",
                (account.address.to_hex(), token.symbol()),
            )
            .await?;

        money::from_wei_string(&raw).map_err(|e| LedgerError::Parse(e.to_string()))
    }

    async fn estimate_fee(
        &self,
        from: &AccountHandle,
        to: Address,
        token: TokenId,
        amount: Amount,
    ) -> Result<FeeEstimate, LedgerError> {
        let raw: RpcFeeEstimate = self
            .call(
                "wallet_estimateFee",
                [RpcTransferParams {
                    request_id: String::new(),
                    from: from.address.to_hex(),
                    to: to.to_hex(),
                    token: token.symbol(),
                    amount: money::to_wei_string(amount),
                }],
            )
            .await?;

        Ok(FeeEstimate {
            fee: money::from_wei_string(&raw.fee).map_err(|e| LedgerError::Parse(e.to_string()))?,
            gas: raw.gas,
            gas_price: money::from_wei_string(&raw.gas_price)
                .map_err(|e| LedgerError::Parse(e.to_string()))?,
            token,
        })
    }

    async fn submit_transfer(
        &self,
        req_id: RedemptionId,
        from: &AccountHandle,
        to: Address,
        token: TokenId,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        let raw: RpcReceipt = self
            .call(
                "wallet_transferToken",
                [RpcTransferParams {
                    request_id: req_id.to_string(),
                    from: from.address.to_hex(),
                    to: to.to_hex(),
                    token: token.symbol(),
                    amount: money::to_wei_string(amount),
                }],
            )
            .await?;

        let transaction_hash = TxHash::from_str(&raw.transaction_hash)
            .map_err(|e| LedgerError::Parse(format!("receipt hash: {}", e)))?;

        let receipt = TransferReceipt {
            transaction_hash,
            block_number: raw.block_number,
            gas_used: raw.gas_used,
            status: raw.status,
        };

        debug!(
            req_id = %req_id,
            tx = %receipt.transaction_hash,
            block = receipt.block_number,
            "Transfer submitted"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_response_parsing() {
        let ok: JsonRpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":"0xabc","id":1}"#).unwrap();
        assert_eq!(ok.result.as_deref(), Some("0xabc"));
        assert!(ok.error.is_none());

        let err: JsonRpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"locked"},"id":2}"#,
        )
        .unwrap();
        assert!(err.result.is_none());
        assert_eq!(err.error.as_ref().unwrap().code, -32000);
    }

    #[test]
    fn test_receipt_parsing() {
        let raw: RpcReceipt = serde_json::from_str(
            r#"{
                "transactionHash": "0x50194f663a5d590376366998b81a3ef38dbc506f88040e52e886389933384df1",
                "blockNumber": 4031079,
                "gasUsed": 31502,
                "status": true
            }"#,
        )
        .unwrap();
        assert_eq!(raw.block_number, 4031079);
        assert_eq!(raw.gas_used, 31502);
        assert!(raw.status);
    }

    #[test]
    fn test_fee_estimate_parsing() {
        let raw: RpcFeeEstimate = serde_json::from_str(
            r#"{"fee": "10000000000000000", "gas": 200000, "gasPrice": "5000000000"}"#,
        )
        .unwrap();
        assert_eq!(raw.fee, "10000000000000000");
        assert_eq!(raw.gas, 200_000);
    }

    #[test]
    fn test_transfer_params_wire_format() {
        let params = RpcTransferParams {
            request_id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
            from: "0xa76df5d1cae697479fa08afa7b0d35e182e0137a".into(),
            to: "0x471ece3750da237f93b8e339c536989b8978a438".into(),
            token: "cUSD",
            amount: "9990000000000000000".into(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["requestId"], "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(json["token"], "cUSD");
        assert_eq!(json["amount"], "9990000000000000000");
    }
}
