//! Webhook signature verification middleware
//!
//! When a shared secret is configured, incoming webhook requests must
//! carry an HMAC-SHA256 signature over `timestamp || body` along with the
//! timestamp itself. Requests outside the drift window are rejected to
//! limit replays. Without a configured secret the middleware is simply
//! not installed.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

/// Maximum webhook body size read for verification
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Header carrying the hex-encoded HMAC-SHA256 signature
pub const SIGNATURE_HEADER: &str = "X-Signature";
/// Header carrying the Unix timestamp the signature covers
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Signature verification state
#[derive(Clone)]
pub struct WebhookAuth {
    secret: Arc<Vec<u8>>,
    max_drift_secs: i64,
}

impl WebhookAuth {
    /// Create verification state for a shared secret
    pub fn new(secret: &str, max_drift_secs: i64) -> Self {
        Self {
            secret: Arc::new(secret.as_bytes().to_vec()),
            max_drift_secs,
        }
    }
}

/// Signature verification middleware
///
/// Extracts signature and timestamp headers, checks the timestamp drift
/// window, then verifies HMAC-SHA256 over `timestamp || body`.
pub async fn signature_verify(
    State(auth): State<WebhookAuth>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let signature = match header_value(&headers, SIGNATURE_HEADER) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let timestamp_str = match header_value(&headers, TIMESTAMP_HEADER) {
        Ok(value) => value,
        Err(response) => return response,
    };

    let timestamp: i64 = match timestamp_str.parse() {
        Ok(ts) => ts,
        Err(_) => return reject(StatusCode::BAD_REQUEST, "Invalid timestamp format"),
    };

    // Replay protection
    let now = Utc::now().timestamp();
    let drift = (now - timestamp).abs();
    if drift > auth.max_drift_secs {
        tracing::warn!(
            timestamp = timestamp,
            drift = drift,
            max_drift = auth.max_drift_secs,
            "Request timestamp outside acceptable window"
        );
        return reject(
            StatusCode::UNAUTHORIZED,
            &format!("Request expired (drift: {}s)", drift),
        );
    }

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return reject(StatusCode::BAD_REQUEST, "Failed to read request body"),
    };

    if !verify_signature(&auth.secret, &signature, &timestamp_str, &body_bytes) {
        tracing::warn!(body_size = body_bytes.len(), "Webhook signature verification failed");
        return reject(StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    tracing::debug!(
        timestamp = timestamp,
        body_size = body_bytes.len(),
        "Webhook signature verified"
    );

    // Hand the buffered body back to the inner handler
    let request = Request::from_parts(parts, Body::from(body_bytes));
    next.run(request).await
}

/// Extract a required header as a string
fn header_value(headers: &HeaderMap, name: &str) -> Result<String, Response> {
    match headers.get(name) {
        Some(value) => value
            .to_str()
            .map(|s| s.to_string())
            .map_err(|_| reject(StatusCode::BAD_REQUEST, "Invalid header encoding")),
        None => Err(reject(
            StatusCode::UNAUTHORIZED,
            &format!("Missing {} header", name),
        )),
    }
}

/// Verify an HMAC-SHA256 signature over `timestamp || body`
fn verify_signature(secret: &[u8], signature: &str, timestamp_str: &str, body: &[u8]) -> bool {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(timestamp_str.as_bytes());
    mac.update(body);

    let expected = hex::encode(mac.finalize().into_bytes());

    // Constant-time comparison to prevent timing attacks
    constant_time_compare(signature, &expected)
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Build a JSON rejection response
fn reject(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "status": "rejected",
        "reason": "authentication_failed",
        "details": message
    });

    (status, Json(body)).into_response()
}
