//! Prometheus metrics for Helmsman
//!
//! Exposes a metrics endpoint for monitoring:
//! - Signals received counter
//! - Trades executed / skipped / failed counters
//! - Trade latency histogram

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics state
pub struct MetricsState {
    /// Prometheus registry
    registry: Registry,
    /// Total webhook signals accepted for processing
    pub signals_received: IntCounter,
    /// Trades submitted and confirmed
    pub trades_executed: IntCounter,
    /// Signals that resulted in a deliberate no-op
    pub trades_skipped: IntCounter,
    /// Submission or confirmation failures
    pub trade_failures: IntCounter,
    /// End-to-end submit+confirm latency in milliseconds
    pub trade_latency: Histogram,
}

impl MetricsState {
    /// Create a new metrics state with all metrics registered
    pub fn new() -> Self {
        let registry = Registry::new();

        let signals_received = IntCounter::with_opts(Opts::new(
            "helmsman_signals_received_total",
            "Total webhook signals accepted for processing",
        ))
        .expect("Failed to create signals_received counter");
        registry
            .register(Box::new(signals_received.clone()))
            .expect("Failed to register signals_received");

        let trades_executed = IntCounter::with_opts(Opts::new(
            "helmsman_trades_executed_total",
            "Trades submitted and confirmed on chain",
        ))
        .expect("Failed to create trades_executed counter");
        registry
            .register(Box::new(trades_executed.clone()))
            .expect("Failed to register trades_executed");

        let trades_skipped = IntCounter::with_opts(Opts::new(
            "helmsman_trades_skipped_total",
            "Signals that resulted in a deliberate no-op",
        ))
        .expect("Failed to create trades_skipped counter");
        registry
            .register(Box::new(trades_skipped.clone()))
            .expect("Failed to register trades_skipped");

        let trade_failures = IntCounter::with_opts(Opts::new(
            "helmsman_trade_failures_total",
            "Transaction submission or confirmation failures",
        ))
        .expect("Failed to create trade_failures counter");
        registry
            .register(Box::new(trade_failures.clone()))
            .expect("Failed to register trade_failures");

        let trade_latency = Histogram::with_opts(HistogramOpts::new(
            "helmsman_trade_latency_ms",
            "Submit and confirm latency in milliseconds",
        ))
        .expect("Failed to create trade_latency histogram");
        registry
            .register(Box::new(trade_latency.clone()))
            .expect("Failed to register trade_latency");

        Self {
            registry,
            signals_received,
            trades_executed,
            trades_skipped,
            trade_failures,
            trade_latency,
        }
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics handler - returns Prometheus metrics in text format
///
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<MetricsState>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = state.registry().gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        buffer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_state_creation() {
        let state = MetricsState::new();
        assert_eq!(state.signals_received.get(), 0);
        assert_eq!(state.trades_executed.get(), 0);
        assert_eq!(state.trade_failures.get(), 0);
    }

    #[test]
    fn test_counters_update() {
        let state = MetricsState::new();
        state.signals_received.inc();
        state.signals_received.inc();
        state.trades_skipped.inc();

        assert_eq!(state.signals_received.get(), 2);
        assert_eq!(state.trades_skipped.get(), 1);
    }

    #[test]
    fn test_encoded_output_includes_registered_metrics() {
        let state = MetricsState::new();
        state.trades_executed.inc();

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&state.registry().gather(), &mut buffer)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("helmsman_trades_executed_total 1"));
        assert!(text.contains("helmsman_trade_latency_ms"));
    }
}
