//! escrowlink - Escrow Invite Gateway
//!
//! Entry point. Architecture:
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌───────────────┐    ┌──────────┐
//! │  Config  │───▶│ Service wire │───▶│ Orchestrator  │───▶│ Gateway  │
//! │  (YAML)  │    │ (node/links) │    │ (redeem FSM)  │    │ (axum)   │
//! └──────────┘    └──────────────┘    └───────────────┘    └──────────┘
//! ```
//!
//! The gateway is stateless: every redemption attempt re-derives its
//! escrow account and re-reads its balance through the wallet node.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use escrowlink::config::AppConfig;
use escrowlink::invite::shortener::{DynamicLinkClient, LinkShortener};
use escrowlink::invite::{ApiState, RedemptionOrchestrator, router};
use escrowlink::ledger::{LedgerService, NodeRpcLedger};
use escrowlink::logging::init_logging;

// ============================================================
// COMMAND LINE
// ============================================================

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

// ============================================================
// SERVICE WIRING
// ============================================================

fn build_services(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn LedgerService>, Arc<dyn LinkShortener>)> {
    if config.use_mock_services {
        #[cfg(feature = "mock-api")]
        {
            tracing::warn!("Serving against MOCK ledger and link services - dev/test only");
            return Ok((
                Arc::new(escrowlink::ledger::MockLedger::new()),
                Arc::new(escrowlink::invite::MockShortener::new()),
            ));
        }
        #[cfg(not(feature = "mock-api"))]
        anyhow::bail!("use_mock_services requires the mock-api feature");
    }

    let ledger =
        NodeRpcLedger::new(config.node.clone()).context("Failed to build wallet node client")?;
    let shortener = DynamicLinkClient::new(config.link_service.clone())
        .context("Failed to build link service client")?;
    Ok((Arc::new(ledger), Arc::new(shortener)))
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env);
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }

    let _guard = init_logging(&config.logging);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        env = %env,
        "Starting escrowlink gateway"
    );

    let (ledger, shortener) = build_services(&config)?;
    let orchestrator = Arc::new(RedemptionOrchestrator::new(
        ledger,
        shortener,
        config.invite.clone(),
    ));

    let state = Arc::new(ApiState { orchestrator });
    let app = router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind gateway to {}", addr))?;
    info!(addr = %addr, "Gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}
