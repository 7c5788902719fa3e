//! Error types for Helmsman

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Validation error (invalid webhook input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wallet key material error
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// RPC/Solana error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Aggregator HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response/instruction parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transaction submission or confirmation failure
    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// Error response structure for the API
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_response) = match &self {
            AppError::Config(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "configuration_error".to_string(),
                    details: Some(e.to_string()),
                },
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    status: "rejected",
                    reason: "validation_failed".to_string(),
                    details: Some(msg.clone()),
                },
            ),
            AppError::Wallet(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "wallet_error".to_string(),
                    details: Some(msg.clone()),
                },
            ),
            AppError::Rpc(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "rpc_error".to_string(),
                    details: Some(msg.clone()),
                },
            ),
            AppError::Http(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "upstream_error".to_string(),
                    details: Some(msg.clone()),
                },
            ),
            AppError::Parse(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "parse_error".to_string(),
                    details: Some(msg.clone()),
                },
            ),
            AppError::Transaction(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error",
                    reason: "transaction_failed".to_string(),
                    details: Some(msg.clone()),
                },
            ),
        };

        // Log the error
        tracing::error!(
            error_type = %self,
            status_code = %status_code,
            "Request error"
        );

        (status_code, Json(json!(error_response))).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("bad action".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transaction_maps_to_server_error() {
        let response = AppError::Transaction("blockhash expired".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = AppError::Rpc("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
