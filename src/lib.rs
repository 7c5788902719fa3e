//! Helmsman Library
//!
//! Webhook-driven swap agent for Solana.
//! This library exposes core modules for testing.

pub mod agent;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for tests
pub use agent::TradingAgent;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use metrics::MetricsState;
pub use models::{Action, SignalPayload, SkipReason, TradeOutcome, TradeReceipt};
