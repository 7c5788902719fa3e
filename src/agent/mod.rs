//! Trading agent
//!
//! The agent owns the long-lived collaborators (RPC client, aggregator
//! client, wallet keypair) and runs the signal pipeline: refresh balances,
//! evaluate the policy, quote, execute. It is constructed once at startup
//! and shared across request handlers; balances and quotes are ephemeral.

pub mod balances;
pub mod executor;
pub mod jupiter;
pub mod policy;

use chrono::Utc;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::MetricsState;
use crate::models::{Action, SkipReason, TradeOutcome, TradeReceipt};
use crate::utils::{lamports_to_sol, sol_to_lamports};

use balances::WalletBalances;
use jupiter::JupiterClient;
use policy::TradeDecision;

/// Stateful trading agent wrapping balance refresh, quoting and execution
pub struct TradingAgent {
    config: Arc<AppConfig>,
    rpc: Arc<RpcClient>,
    jupiter: JupiterClient,
    keypair: Keypair,
    native_mint: Pubkey,
    stable_mint: Pubkey,
    metrics: Arc<MetricsState>,
}

impl TradingAgent {
    /// Build the agent from configuration and key material
    pub fn new(
        config: Arc<AppConfig>,
        keypair: Keypair,
        metrics: Arc<MetricsState>,
    ) -> AppResult<Self> {
        let rpc = Arc::new(RpcClient::new_with_timeout_and_commitment(
            config.rpc.url.clone(),
            Duration::from_millis(config.rpc.timeout_ms),
            config.rpc.commitment(),
        ));

        let jupiter = JupiterClient::new(&config.jupiter);

        let native_mint = Pubkey::from_str(crate::constants::mints::SOL)
            .map_err(|e| AppError::Validation(format!("Invalid native mint: {}", e)))?;
        let stable_mint = Pubkey::from_str(&config.trading.stable_mint)
            .map_err(|e| AppError::Validation(format!("Invalid stable mint: {}", e)))?;

        Ok(Self {
            config,
            rpc,
            jupiter,
            keypair,
            native_mint,
            stable_mint,
            metrics,
        })
    }

    /// Public key of the agent wallet
    pub fn wallet_pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Probe the RPC endpoint
    pub async fn rpc_healthy(&self) -> bool {
        self.rpc.get_latest_blockhash().await.is_ok()
    }

    /// Refresh wallet balances from chain
    pub async fn refresh_balances(&self) -> AppResult<WalletBalances> {
        let snapshot =
            balances::fetch_balances(&self.rpc, &self.keypair.pubkey(), &self.stable_mint).await?;

        tracing::info!(
            native_sol = lamports_to_sol(snapshot.native_lamports),
            stable_atoms = snapshot.stable_atoms,
            "Balances refreshed"
        );

        Ok(snapshot)
    }

    /// Handle one validated signal end to end
    ///
    /// Balance refresh completes before policy evaluation, which completes
    /// before the quote request. A policy skip or a quote-stage failure is
    /// a successful no-op; only balance-fetch and submission errors
    /// propagate to the caller.
    pub async fn handle_signal(&self, action: Action) -> AppResult<TradeOutcome> {
        let trade_id = Uuid::new_v4().to_string();
        self.metrics.signals_received.inc();

        let snapshot = self.refresh_balances().await?;

        let gas_reserve = sol_to_lamports(self.config.trading.gas_reserve_sol);
        let amount = match policy::decide(action, &snapshot, gas_reserve) {
            TradeDecision::Skip { reason } => {
                tracing::info!(
                    trade_id = %trade_id,
                    action = %action,
                    reason = %reason,
                    "Signal resulted in no trade"
                );
                self.metrics.trades_skipped.inc();
                return Ok(TradeOutcome::Skipped { reason });
            }
            TradeDecision::Trade { amount } => amount,
        };

        let (input_mint, output_mint) = match action {
            Action::Sell => (self.native_mint, self.stable_mint),
            Action::Buy => (self.stable_mint, self.native_mint),
        };

        let quote = match self.jupiter.quote(&input_mint, &output_mint, amount).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(trade_id = %trade_id, error = %e, "Quote unavailable, skipping trade");
                self.metrics.trades_skipped.inc();
                return Ok(TradeOutcome::Skipped {
                    reason: SkipReason::QuoteUnavailable,
                });
            }
        };

        let quoted_out = quote.out_amount_atoms();
        tracing::info!(
            trade_id = %trade_id,
            action = %action,
            amount_in = amount,
            quoted_out = quoted_out,
            "Quote received"
        );

        let instruction_set = match self
            .jupiter
            .swap_instructions(quote, &self.wallet_pubkey())
            .await
        {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(trade_id = %trade_id, error = %e, "Swap instructions unavailable, skipping trade");
                self.metrics.trades_skipped.inc();
                return Ok(TradeOutcome::Skipped {
                    reason: SkipReason::NoInstructions,
                });
            }
        };

        let instructions = executor::convert_all(&instruction_set.flatten());
        if instructions.is_empty() {
            tracing::warn!(trade_id = %trade_id, "Aggregator returned no usable instructions, skipping trade");
            self.metrics.trades_skipped.inc();
            return Ok(TradeOutcome::Skipped {
                reason: SkipReason::NoInstructions,
            });
        }

        let started = Instant::now();
        let signature = match executor::sign_and_submit(&self.rpc, &self.keypair, &instructions).await
        {
            Ok(signature) => signature,
            Err(e) => {
                tracing::error!(trade_id = %trade_id, error = %e, "Swap submission failed");
                self.metrics.trade_failures.inc();
                return Err(e);
            }
        };

        self.metrics
            .trade_latency
            .observe(started.elapsed().as_millis() as f64);
        self.metrics.trades_executed.inc();

        tracing::info!(
            trade_id = %trade_id,
            signature = %signature,
            "Swap confirmed"
        );

        Ok(TradeOutcome::Executed {
            receipt: TradeReceipt {
                trade_id,
                action: action.to_string(),
                input_mint: input_mint.to_string(),
                output_mint: output_mint.to_string(),
                amount_in: amount,
                quoted_out,
                signature,
                confirmed_at: Utc::now(),
            },
        })
    }
}
