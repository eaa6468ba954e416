//! Link Shortener Client
//!
//! The payload URL embeds the redemption key and is too unwieldy (and too
//! revealing) to paste into an SMS. The shortener service turns it into a
//! store-aware short link. Unreachable or refusing service surfaces as
//! `EncodingError` upstream - invites are never sent with a raw payload URL.

#[cfg(feature = "mock-api")]
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Shortener errors
#[derive(Debug, Error, Clone)]
pub enum ShortenError {
    #[error("Link service unreachable: {0}")]
    Unreachable(String),

    #[error("Link service rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid link service response: {0}")]
    InvalidResponse(String),
}

/// Store metadata attached to a short link so the app stores can route
/// non-installed users
#[derive(Debug, Clone)]
pub struct LinkMetadata {
    pub app_store_id: String,
    pub bundle_id: String,
}

/// Link shortener service contract
#[async_trait]
pub trait LinkShortener: Send + Sync {
    /// Service name for logging
    fn name(&self) -> &'static str;

    /// Shorten `long_url`, tagging it with store metadata
    async fn shorten(&self, long_url: &str, meta: &LinkMetadata) -> Result<String, ShortenError>;
}

// ============================================================================
// Dynamic-links HTTP client
// ============================================================================

/// Link service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkServiceConfig {
    /// Shortener endpoint, e.g. "https://link.example.com/v1/shortLinks"
    pub api_url: String,
    /// API key appended as a query parameter, when the service requires one
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LinkServiceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://link.example.com/v1/shortLinks".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShortLinkRequest<'a> {
    dynamic_link_info: DynamicLinkInfo<'a>,
    suffix: Suffix,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DynamicLinkInfo<'a> {
    link: &'a str,
    android_info: AndroidInfo<'a>,
    ios_info: IosInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AndroidInfo<'a> {
    android_package_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IosInfo<'a> {
    ios_bundle_id: &'a str,
    ios_app_store_id: &'a str,
}

#[derive(Serialize)]
struct Suffix {
    option: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShortLinkResponse {
    short_link: String,
}

/// HTTP client for a dynamic-links style shortener service
pub struct DynamicLinkClient {
    config: LinkServiceConfig,
    client: reqwest::Client,
}

impl DynamicLinkClient {
    pub fn new(config: LinkServiceConfig) -> Result<Self, ShortenError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ShortenError::Unreachable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        match &self.config.api_key {
            Some(key) => format!("{}?key={}", self.config.api_url, key),
            None => self.config.api_url.clone(),
        }
    }
}

#[async_trait]
impl LinkShortener for DynamicLinkClient {
    fn name(&self) -> &'static str {
        "dynamic-links"
    }

    async fn shorten(&self, long_url: &str, meta: &LinkMetadata) -> Result<String, ShortenError> {
        let request = ShortLinkRequest {
            dynamic_link_info: DynamicLinkInfo {
                link: long_url,
                android_info: AndroidInfo {
                    android_package_name: &meta.bundle_id,
                },
                ios_info: IosInfo {
                    ios_bundle_id: &meta.bundle_id,
                    ios_app_store_id: &meta.app_store_id,
                },
            },
            suffix: Suffix { option: "SHORT" },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| ShortenError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShortenError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ShortLinkResponse = response
            .json()
            .await
            .map_err(|e| ShortenError::InvalidResponse(e.to_string()))?;

        debug!(short_link = %parsed.short_link, "Shortened invite link");
        Ok(parsed.short_link)
    }
}

// ============================================================================
// Mock shortener
// ============================================================================

/// Mock shortener for dev and tests
#[cfg(feature = "mock-api")]
pub struct MockShortener {
    fail: Mutex<bool>,
    /// Last long URL received, for test assertions
    last_request: Mutex<Option<String>>,
}

#[cfg(feature = "mock-api")]
impl MockShortener {
    pub fn new() -> Self {
        Self {
            fail: Mutex::new(false),
            last_request: Mutex::new(None),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }
}

#[cfg(feature = "mock-api")]
impl Default for MockShortener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "mock-api")]
#[async_trait]
impl LinkShortener for MockShortener {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn shorten(&self, long_url: &str, _meta: &LinkMetadata) -> Result<String, ShortenError> {
        *self.last_request.lock().unwrap() = Some(long_url.to_string());

        if *self.fail.lock().unwrap() {
            return Err(ShortenError::Unreachable("mock shortener failure".into()));
        }

        Ok("https://vlra.page.link/PARAMS".to_string())
    }
}
