//! Webhook handler for incoming trading signals

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::agent::TradingAgent;
use crate::error::AppError;
use crate::models::{SignalPayload, TradeOutcome, TradeReceipt};

/// State needed by the webhook handler
pub struct WebhookState {
    /// The trading agent, constructed once at startup
    pub agent: Arc<TradingAgent>,
}

/// Webhook response
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// What happened to the signal
    pub status: WebhookStatus,
    /// Human-readable detail for skips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Trade receipt for executed swaps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TradeReceipt>,
}

/// Webhook status
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    /// A swap was submitted and confirmed
    Executed,
    /// The signal was valid but no trade was warranted
    Skipped,
}

/// Webhook handler
///
/// POST /webhook
///
/// The action field is validated before any chain access: an invalid
/// action is rejected with 400 and triggers no balance query or trade.
/// Valid signals run the full pipeline; a policy skip or missing quote is
/// still a 200, execution failures surface as 500.
pub async fn webhook_handler(
    State(state): State<Arc<WebhookState>>,
    Json(payload): Json<SignalPayload>,
) -> Result<(StatusCode, Json<WebhookResponse>), AppError> {
    let action = payload.validate().map_err(AppError::Validation)?;

    tracing::info!(action = %action, "Signal received");

    match state.agent.handle_signal(action).await? {
        TradeOutcome::Executed { receipt } => Ok((
            StatusCode::OK,
            Json(WebhookResponse {
                status: WebhookStatus::Executed,
                detail: None,
                receipt: Some(receipt),
            }),
        )),
        TradeOutcome::Skipped { reason } => Ok((
            StatusCode::OK,
            Json(WebhookResponse {
                status: WebhookStatus::Skipped,
                detail: Some(reason.to_string()),
                receipt: None,
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let response = WebhookResponse {
            status: WebhookStatus::Skipped,
            detail: Some("stable balance is zero".to_string()),
            receipt: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("skipped"));
        assert!(json.contains("stable balance is zero"));
        assert!(!json.contains("receipt"));
    }

    #[test]
    fn test_payload_rejects_non_trade_action() {
        let payload: SignalPayload = serde_json::from_str(r#"{"action": "hold"}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
