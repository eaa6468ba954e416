//! Invite Link Codec
//!
//! Encodes a redemption key into the shareable payload URL
//! (`{web_link}/?invite-code=0x…`) and extracts it back out of pasted or
//! deep-linked URLs. Decoding is strict: a link either yields a valid
//! 32-byte key or a `MalformedLink` error, never a partial result.

use tracing::debug;

use super::error::InviteError;
use super::shortener::{LinkMetadata, LinkShortener};
use super::types::InviteLink;
use crate::config::InviteConfig;
use crate::core_types::{Address, RedemptionKey};

/// Query parameter carrying the key
pub const INVITE_CODE_PARAM: &str = "invite-code";

/// Build the long payload URL embedding the key.
///
/// The result is as sensitive as the key itself.
pub fn payload_url(web_link: &str, key: &RedemptionKey) -> String {
    format!(
        "{}/?{}={}",
        web_link.trim_end_matches('/'),
        INVITE_CODE_PARAM,
        key.to_hex()
    )
}

/// Extract the redemption key from an invite URL.
///
/// Accepts any URL whose query string carries a valid `invite-code`
/// parameter; everything else is a `MalformedLink`.
pub fn extract_key(url: &str) -> Result<RedemptionKey, InviteError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(InviteError::MalformedLink("empty link".into()));
    }

    let query = url
        .split_once('?')
        .map(|(_, q)| q)
        .ok_or_else(|| InviteError::MalformedLink("link has no query string".into()))?;

    // Drop any fragment before scanning parameters
    let query = query.split('#').next().unwrap_or("");

    for pair in query.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        if name != INVITE_CODE_PARAM {
            continue;
        }
        return value
            .parse::<RedemptionKey>()
            .map_err(|e| InviteError::MalformedLink(format!("invalid invite code: {}", e)));
    }

    Err(InviteError::MalformedLink(format!(
        "missing {} parameter",
        INVITE_CODE_PARAM
    )))
}

/// Build the full shareable invite link for a funded escrow account.
///
/// Shortening goes through the link service; its failure is an
/// `EncodingError` - we never hand out the raw payload URL.
pub async fn generate_invite_link(
    shortener: &dyn LinkShortener,
    config: &InviteConfig,
    key: &RedemptionKey,
    escrow_address: Address,
) -> Result<InviteLink, InviteError> {
    let payload_url = payload_url(&config.web_link, key);
    let meta = LinkMetadata {
        app_store_id: config.app_store_id.clone(),
        bundle_id: config.bundle_id.clone(),
    };

    let short_url = shortener
        .shorten(&payload_url, &meta)
        .await
        .map_err(|e| InviteError::Encoding(e.to_string()))?;

    debug!(
        service = shortener.name(),
        escrow = %escrow_address,
        short_url = %short_url,
        "Generated invite link"
    );

    Ok(InviteLink {
        key: key.clone(),
        escrow_address,
        payload_url,
        short_url,
        app_store_id: config.app_store_id.clone(),
        bundle_id: config.bundle_id.clone(),
    })
}
