//! Helmsman - webhook-driven swap agent for Solana
//!
//! This is the main entry point for the service. It loads configuration
//! and wallet key material, constructs the trading agent, and serves the
//! webhook ingress.

mod agent;
mod config;
mod constants;
mod error;
mod handlers;
mod metrics;
mod middleware;
mod models;
mod utils;
mod wallet;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use solana_sdk::signature::Signer;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::agent::TradingAgent;
use crate::config::AppConfig;
use crate::handlers::{health_check, webhook_handler, AppState, WebhookState};
use crate::metrics::{metrics_handler, MetricsState};
use crate::middleware::WebhookAuth;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    tracing::info!("Starting Helmsman v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        rpc_url = %config.rpc.url,
        "Configuration loaded"
    );

    // Load wallet key material - fatal if missing
    let keypair = wallet::load_keypair_from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load wallet key: {}", e))?;
    tracing::info!(wallet = %keypair.pubkey(), "Wallet key loaded");

    let config = Arc::new(config);
    let metrics = Arc::new(MetricsState::new());

    // Construct the agent context once; it is shared by all request handlers
    let agent = Arc::new(
        TradingAgent::new(config.clone(), keypair, metrics.clone())
            .map_err(|e| anyhow::anyhow!("Failed to construct trading agent: {}", e))?,
    );
    tracing::info!(
        gas_reserve_sol = config.trading.gas_reserve_sol,
        stable_mint = %config.trading.stable_mint,
        "Trading agent initialized"
    );

    // Create shared state
    let webhook_state = Arc::new(WebhookState {
        agent: agent.clone(),
    });

    let app_state = Arc::new(AppState {
        agent,
        started_at: Utc::now(),
    });

    // Create rate limiter configuration
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.security.webhook_rate_limit as u64)
            .burst_size(config.security.webhook_burst_size)
            .finish()
            .expect("Failed to create rate limiter config"),
    );

    tracing::info!(
        rate_limit = config.security.webhook_rate_limit,
        burst_size = config.security.webhook_burst_size,
        "Rate limiting configured"
    );

    // Webhook route, optionally behind signature verification
    let mut webhook_routes = Router::new().route("/webhook", post(webhook_handler));

    if config.security.webhook_secret.is_empty() {
        tracing::warn!("Webhook secret not configured - signature verification disabled");
    } else {
        let auth = WebhookAuth::new(
            &config.security.webhook_secret,
            config.security.max_timestamp_drift_secs,
        );
        webhook_routes = webhook_routes.layer(axum_middleware::from_fn_with_state(
            auth,
            middleware::signature_verify,
        ));
        tracing::info!("Webhook signature verification enabled");
    }

    let webhook_routes = webhook_routes
        .layer(GovernorLayer {
            config: rate_limit_config,
        })
        .with_state(webhook_state);

    // Health and metrics routes (no authentication)
    let health_routes = Router::new()
        .route("/health", get(health_check))
        .with_state(app_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics);

    // Build final router
    let app = Router::new()
        .merge(webhook_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("Invalid server address");

    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // Connect info is required by the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helmsman=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Load and validate configuration
fn load_config() -> anyhow::Result<AppConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!env!("CARGO_PKG_VERSION").is_empty());
    }
}
