//! Configuration management for Helmsman
//!
//! Loads configuration from optional config files and environment
//! variables. Environment variables override file values.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Jupiter API configuration
    #[serde(default)]
    pub jupiter: JupiterConfig,
    /// Trading parameters
    #[serde(default)]
    pub trading: TradingConfig,
    /// Security settings
    #[serde(default)]
    pub security: SecurityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Solana RPC endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_ms: u64,
    /// Commitment level awaited on submission: processed, confirmed or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

fn default_rpc_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_rpc_timeout() -> u64 {
    30_000
}

fn default_commitment() -> String {
    "finalized".to_string()
}

impl RpcConfig {
    /// Parse the configured commitment level, defaulting to finalized
    pub fn commitment(&self) -> CommitmentConfig {
        match self.commitment.as_str() {
            "processed" => CommitmentConfig::processed(),
            "confirmed" => CommitmentConfig::confirmed(),
            _ => CommitmentConfig::finalized(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_ms: default_rpc_timeout(),
            commitment: default_commitment(),
        }
    }
}

/// Jupiter API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JupiterConfig {
    /// Jupiter API base URL
    #[serde(default = "default_jupiter_api_url")]
    pub api_url: String,
    /// Slippage tolerance in basis points
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    /// HTTP request timeout in milliseconds
    #[serde(default = "default_jupiter_timeout")]
    pub timeout_ms: u64,
}

fn default_jupiter_api_url() -> String {
    "https://lite-api.jup.ag/swap/v1".to_string()
}

fn default_slippage_bps() -> u16 {
    50
}

fn default_jupiter_timeout() -> u64 {
    30_000
}

impl Default for JupiterConfig {
    fn default() -> Self {
        Self {
            api_url: default_jupiter_api_url(),
            slippage_bps: default_slippage_bps(),
            timeout_ms: default_jupiter_timeout(),
        }
    }
}

/// Trading parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Native balance kept back from every sell so fees stay payable (SOL)
    #[serde(default = "default_gas_reserve")]
    pub gas_reserve_sol: f64,
    /// Mint address of the stable counter-asset
    #[serde(default = "default_stable_mint")]
    pub stable_mint: String,
}

fn default_gas_reserve() -> f64 {
    0.201
}

fn default_stable_mint() -> String {
    crate::constants::mints::USDC.to_string()
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            gas_reserve_sol: default_gas_reserve(),
            stable_mint: default_stable_mint(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// HMAC secret for webhook verification; empty disables verification
    #[serde(default)]
    pub webhook_secret: String,
    /// Maximum timestamp drift in seconds for replay protection
    #[serde(default = "default_max_timestamp_drift")]
    pub max_timestamp_drift_secs: i64,
    /// Rate limit: max webhook requests per second
    #[serde(default = "default_webhook_rate_limit")]
    pub webhook_rate_limit: u32,
    /// Rate limit: burst size
    #[serde(default = "default_webhook_burst")]
    pub webhook_burst_size: u32,
}

fn default_max_timestamp_drift() -> i64 {
    60
}

fn default_webhook_rate_limit() -> u32 {
    100
}

fn default_webhook_burst() -> u32 {
    150
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            webhook_secret: String::new(),
            max_timestamp_drift_secs: default_max_timestamp_drift(),
            webhook_rate_limit: default_webhook_rate_limit(),
            webhook_burst_size: default_webhook_burst(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (HELMSMAN_*)
    /// 2. config/config.{yaml,toml} (if exists)
    /// 3. config.{yaml,toml} (if exists)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config/config").required(false))
            // HELMSMAN_SERVER__PORT=8081 -> server.port = 8081
            // HELMSMAN_TRADING__GAS_RESERVE_SOL=0.3 -> trading.gas_reserve_sol = 0.3
            .add_source(
                Environment::with_prefix("HELMSMAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.url.is_empty() {
            return Err(ConfigError::Message("RPC URL must be set".to_string()));
        }

        if self.jupiter.api_url.is_empty() {
            return Err(ConfigError::Message(
                "Jupiter API URL must be set".to_string(),
            ));
        }

        if self.jupiter.slippage_bps > 10_000 {
            return Err(ConfigError::Message(
                "Slippage must not exceed 10000 bps".to_string(),
            ));
        }

        if self.trading.gas_reserve_sol < 0.0 {
            return Err(ConfigError::Message(
                "Gas reserve cannot be negative".to_string(),
            ));
        }

        if self.trading.stable_mint.is_empty() {
            return Err(ConfigError::Message(
                "Stable mint address must be set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.trading.gas_reserve_sol, 0.201);
        assert_eq!(config.rpc.commitment, "finalized");
        assert!(config.security.webhook_secret.is_empty());
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_excessive_slippage_rejected() {
        let mut config = AppConfig::default();
        config.jupiter.slippage_bps = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_reserve_rejected() {
        let mut config = AppConfig::default();
        config.trading.gas_reserve_sol = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_commitment_parsing() {
        let mut config = RpcConfig::default();
        assert_eq!(config.commitment(), CommitmentConfig::finalized());

        config.commitment = "confirmed".to_string();
        assert_eq!(config.commitment(), CommitmentConfig::confirmed());

        config.commitment = "bogus".to_string();
        assert_eq!(config.commitment(), CommitmentConfig::finalized());
    }
}
