//! Invite API Layer
//!
//! HTTP surface for the invite flow: create an invite (fund escrow +
//! short link) and redeem one. A push-notification trigger `{type, key}`
//! maps straight onto the redeem payload - the gateway doesn't care who
//! delivered the key.
//!
//! Completed redemption attempts always answer 200 with the terminal
//! outcome in the body; only request-level errors (bad address, malformed
//! link) use HTTP error statuses.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InviteError;
use super::link;
use super::orchestrator::RedemptionOrchestrator;
use super::types::RedemptionOutcome;
use crate::core_types::{Address, RedemptionKey};
use crate::money;
use crate::token::{TokenId, token_info};

// ============================================================================
// API Request/Response Types
// ============================================================================

/// API request for creating an invite
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    /// Sender account address (must be held by the wallet node)
    pub sender: String,
    /// Invite amount in token units (e.g. "5.00")
    pub amount: Decimal,
    /// Token symbol; defaults to cUSD
    #[serde(default)]
    pub token: Option<String>,
}

/// API response for a created invite
#[derive(Debug, Serialize)]
pub struct CreateInviteResponse {
    /// Escrow account now holding the invite amount
    pub escrow_address: String,
    /// Shareable short link
    pub short_url: String,
    pub token: String,
    /// Amount escrowed, echoed back as a string
    pub amount: String,
    /// Timestamp (milliseconds)
    pub timestamp: i64,
}

/// API request for redeeming an invite.
///
/// Exactly one of `key` or `link` must be present.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// Raw redemption key (`0x…`), e.g. from a push payload
    #[serde(default)]
    pub key: Option<String>,
    /// Full invite link to decode instead
    #[serde(default)]
    pub link: Option<String>,
    /// Redeemer's real account address
    pub destination: String,
    /// Token symbol; defaults to cUSD
    #[serde(default)]
    pub token: Option<String>,
}

/// API response for a completed redemption attempt
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    /// Unique attempt id (ULID)
    pub req_id: String,
    /// Terminal state: "SUCCEEDED" or "FAILED"
    pub status: String,
    /// Failure reason code when status is "FAILED"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Net amount delivered, as a token-unit string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred: Option<String>,
    /// Fee deducted, as a token-unit string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    /// Refresh hint: the account whose balance changed on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Timestamp (milliseconds)
    pub timestamp: i64,
}

/// API wrapper for standard response format
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            data: Some(data),
            msg: None,
        }
    }

    pub fn error(code: i32, msg: impl ToString) -> Self {
        Self {
            code,
            data: None,
            msg: Some(msg.to_string()),
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

pub mod error_codes {
    pub const INVALID_PARAMETER: i32 = -1001;
    pub const INVALID_AMOUNT: i32 = -1002;
    pub const UNKNOWN_TOKEN: i32 = -1003;
    pub const MALFORMED_LINK: i32 = -1004;
    pub const ENCODING_FAILED: i32 = -2001;
    pub const ACCOUNT_CREATION_FAILED: i32 = -3001;
    pub const EMPTY_BALANCE: i32 = -3002;
    pub const TRANSFER_FAILED: i32 = -3003;
    pub const SYSTEM_ERROR: i32 = -5000;
}

fn error_code(err: &InviteError) -> i32 {
    match err {
        InviteError::Encoding(_) => error_codes::ENCODING_FAILED,
        InviteError::MalformedLink(_) => error_codes::MALFORMED_LINK,
        InviteError::InvalidAmount
        | InviteError::PrecisionOverflow
        | InviteError::Overflow => error_codes::INVALID_AMOUNT,
        InviteError::InvalidAddress(_) => error_codes::INVALID_PARAMETER,
        InviteError::UnknownToken(_) => error_codes::UNKNOWN_TOKEN,
        InviteError::AccountCreation(_) => error_codes::ACCOUNT_CREATION_FAILED,
        InviteError::EmptyBalance => error_codes::EMPTY_BALANCE,
        InviteError::Transfer(_) => error_codes::TRANSFER_FAILED,
        InviteError::System(_) => error_codes::SYSTEM_ERROR,
    }
}

fn error_response<T>(err: &InviteError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(error_code(err), err)))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_address(s: &str, what: &str) -> Result<Address, InviteError> {
    s.parse::<Address>()
        .map_err(|e| InviteError::InvalidAddress(format!("{}: {}", what, e)))
}

fn parse_token(s: &Option<String>) -> Result<TokenId, InviteError> {
    match s {
        None => Ok(TokenId::StableDollar),
        Some(sym) => {
            TokenId::from_symbol(sym).ok_or_else(|| InviteError::UnknownToken(sym.clone()))
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Handlers
// ============================================================================

/// Shared gateway state
pub struct ApiState {
    pub orchestrator: Arc<RedemptionOrchestrator>,
}

/// POST /api/v1/invites
pub async fn create_invite(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateInviteRequest>,
) -> (StatusCode, Json<ApiResponse<CreateInviteResponse>>) {
    let sender = match parse_address(&payload.sender, "sender") {
        Ok(addr) => addr,
        Err(e) => return error_response(&e),
    };
    let token = match parse_token(&payload.token) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let decimals = token_info(token).decimals;
    let amount = match money::parse_decimal(payload.amount, decimals) {
        Ok(a) => a,
        Err(e) => return error_response(&InviteError::from(e)),
    };

    let handle = crate::ledger::AccountHandle::new(sender);
    match state.orchestrator.create_invite(&handle, amount, token).await {
        Ok(invite) => (
            StatusCode::OK,
            Json(ApiResponse::success(CreateInviteResponse {
                escrow_address: invite.escrow_address.to_hex(),
                short_url: invite.short_url,
                token: token.symbol().to_string(),
                amount: money::format_amount_full(amount, decimals),
                timestamp: now_millis(),
            })),
        ),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/redemptions
pub async fn redeem(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RedeemRequest>,
) -> (StatusCode, Json<ApiResponse<RedeemResponse>>) {
    let key = match extract_request_key(&payload) {
        Ok(k) => k,
        Err(e) => return error_response(&e),
    };
    let destination = match parse_address(&payload.destination, "destination") {
        Ok(addr) => addr,
        Err(e) => return error_response(&e),
    };
    let token = match parse_token(&payload.token) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let decimals = token_info(token).decimals;

    let outcome = state.orchestrator.redeem(&key, destination, token).await;
    let response = match outcome {
        RedemptionOutcome::Succeeded {
            id,
            destination,
            receipt,
            transferred,
            fee,
        } => RedeemResponse {
            req_id: id.to_string(),
            status: "SUCCEEDED".to_string(),
            reason: None,
            transaction_hash: Some(receipt.transaction_hash.to_hex()),
            transferred: Some(money::format_amount_full(transferred, decimals)),
            fee: Some(money::format_amount_full(fee, decimals)),
            destination: Some(destination.to_hex()),
            timestamp: now_millis(),
        },
        RedemptionOutcome::Failed { id, reason, .. } => RedeemResponse {
            req_id: id.to_string(),
            status: "FAILED".to_string(),
            reason: Some(reason.as_str().to_string()),
            transaction_hash: None,
            transferred: None,
            fee: None,
            destination: None,
            timestamp: now_millis(),
        },
    };

    (StatusCode::OK, Json(ApiResponse::success(response)))
}

fn extract_request_key(payload: &RedeemRequest) -> Result<RedemptionKey, InviteError> {
    match (&payload.key, &payload.link) {
        (Some(raw), _) => raw
            .parse::<RedemptionKey>()
            .map_err(|e| InviteError::MalformedLink(format!("invalid key: {}", e))),
        (None, Some(url)) => link::extract_key(url),
        (None, None) => Err(InviteError::MalformedLink(
            "provide either key or link".into(),
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
}

/// GET /api/v1/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
    })
}

/// Build the gateway router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/v1/invites", post(create_invite))
        .route("/api/v1/redemptions", post(redeem))
        .route("/api/v1/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            error_code(&InviteError::EmptyBalance),
            error_codes::EMPTY_BALANCE
        );
        assert_eq!(
            error_code(&InviteError::MalformedLink("x".into())),
            error_codes::MALFORMED_LINK
        );
        assert_eq!(
            error_code(&InviteError::Transfer("x".into())),
            error_codes::TRANSFER_FAILED
        );
    }

    #[test]
    fn test_extract_request_key_prefers_raw_key() {
        const KEY: &str = "0x1129eb2fbccdc663f4923a6495c35b096249812b589f7c4cd1dba01e1edaf724";
        let payload = RedeemRequest {
            key: Some(KEY.into()),
            link: Some("https://valoraapp.com/?invite-code=0xdeadbeef".into()),
            destination: "0x471ece3750da237f93b8e339c536989b8978a438".into(),
            token: None,
        };
        assert_eq!(extract_request_key(&payload).unwrap().to_hex(), KEY);
    }

    #[test]
    fn test_extract_request_key_requires_one_source() {
        let payload = RedeemRequest {
            key: None,
            link: None,
            destination: "0x471ece3750da237f93b8e339c536989b8978a438".into(),
            token: None,
        };
        assert!(matches!(
            extract_request_key(&payload),
            Err(InviteError::MalformedLink(_))
        ));
    }

    #[test]
    fn test_redeem_request_from_push_payload() {
        // The push layer delivers {type, key}; unknown fields are ignored
        let json = r#"{
            "type": "redeem-invite",
            "key": "0x1129eb2fbccdc663f4923a6495c35b096249812b589f7c4cd1dba01e1edaf724",
            "destination": "0x471ece3750da237f93b8e339c536989b8978a438"
        }"#;
        let payload: RedeemRequest = serde_json::from_str(json).unwrap();
        assert!(payload.key.is_some());
        assert!(extract_request_key(&payload).is_ok());
    }
}
