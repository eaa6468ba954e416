use serde::{Deserialize, Serialize};
use std::fs;

use crate::invite::shortener::LinkServiceConfig;
use crate::ledger::rpc::NodeRpcConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
    /// Wallet node RPC connection
    #[serde(default)]
    pub node: NodeRpcConfig,
    /// Link shortener service
    #[serde(default)]
    pub link_service: LinkServiceConfig,
    pub invite: InviteConfig,
    /// Serve against in-process mocks instead of real services.
    /// Only honored when the `mock-api` feature is compiled in.
    #[serde(default)]
    pub use_mock_services: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub use_json: bool,
    pub rotation: String,
    pub enable_tracing: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "./logs".to_string(),
            file: "escrowlink.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            enable_tracing: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Invite-link branding and store routing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InviteConfig {
    /// Web landing page the payload URL points at
    pub web_link: String,
    /// iOS App Store id for the short-link store redirect
    pub app_store_id: String,
    /// App bundle id (iOS bundle / Android package)
    pub bundle_id: String,
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
gateway:
  host: "127.0.0.1"
  port: 8080
invite:
  web_link: "https://valoraapp.com"
  app_store_id: "1482389446"
  bundle_id: "org.celo.mobile.alfajores"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.invite.bundle_id, "org.celo.mobile.alfajores");
        // Defaults fill in the rest
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.node.url, "http://localhost:8545");
        assert!(!config.use_mock_services);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
logging:
  level: "debug"
  dir: "/var/log/escrowlink"
  file: "escrowlink.log"
  use_json: true
  rotation: "hourly"
  enable_tracing: true
gateway:
  host: "0.0.0.0"
  port: 9000
node:
  url: "http://node.internal:8545"
  timeout_secs: 10
link_service:
  api_url: "https://links.internal/v1/shortLinks"
  api_key: "k123"
invite:
  web_link: "https://valoraapp.com"
  app_store_id: "1482389446"
  bundle_id: "org.celo.mobile.alfajores"
use_mock_services: true
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.logging.use_json);
        assert_eq!(config.node.timeout_secs, 10);
        assert_eq!(config.link_service.api_key.as_deref(), Some("k123"));
        assert!(config.use_mock_services);
    }
}
