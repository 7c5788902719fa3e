//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::agent::TradingAgent;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall system status
    pub status: HealthStatus,
    /// Uptime in seconds
    pub uptime_seconds: i64,
    /// RPC endpoint status
    pub rpc: ComponentHealth,
}

/// Health status enum
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Component health status
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared application state for health checks
pub struct AppState {
    /// The trading agent (used for the RPC probe)
    pub agent: Arc<TradingAgent>,
    /// Application start time
    pub started_at: chrono::DateTime<Utc>,
}

/// Health check handler
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = (Utc::now() - state.started_at).num_seconds();

    let rpc = if state.agent.rpc_healthy().await {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        tracing::warn!("RPC health probe failed");
        ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some("blockhash query failed".to_string()),
        }
    };

    let overall = rpc.status;
    let status_code = match overall {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            uptime_seconds: uptime,
            rpc,
        }),
    )
}
