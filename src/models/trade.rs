//! Trade outcome models
//!
//! A handled signal either executes a swap or deliberately does nothing.
//! Both are successes from the caller's point of view; only RPC and
//! submission failures surface as errors.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a signal resulted in no trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Native balance at or below the gas reserve
    BelowGasReserve,
    /// Spendable native balance smaller than one whole unit
    NoWholeUnit,
    /// Stable-asset balance is zero
    NoStableBalance,
    /// The aggregator returned no usable quote
    QuoteUnavailable,
    /// The aggregator returned no usable instructions for the quote
    NoInstructions,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::BelowGasReserve => "native balance at or below gas reserve",
            SkipReason::NoWholeUnit => "less than one whole unit above gas reserve",
            SkipReason::NoStableBalance => "stable balance is zero",
            SkipReason::QuoteUnavailable => "no quote available",
            SkipReason::NoInstructions => "no usable swap instructions",
        };
        write!(f, "{}", text)
    }
}

/// Record of a submitted and confirmed swap
#[derive(Debug, Clone, Serialize)]
pub struct TradeReceipt {
    /// Identifier assigned to this signal for log correlation
    pub trade_id: String,
    /// Direction of the trade
    pub action: String,
    /// Mint of the asset sold
    pub input_mint: String,
    /// Mint of the asset bought
    pub output_mint: String,
    /// Input amount in atomic units (lamports or token atoms)
    pub amount_in: u64,
    /// Output amount the quote promised, in atomic units
    pub quoted_out: u64,
    /// Transaction signature
    pub signature: String,
    /// When the network confirmed the transaction
    pub confirmed_at: DateTime<Utc>,
}

/// Result of handling one signal
///
/// Explicit so callers can tell a no-op from a failure without reading logs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TradeOutcome {
    /// A swap was submitted and confirmed
    Executed { receipt: TradeReceipt },
    /// The policy or the aggregator declined the trade
    Skipped { reason: SkipReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_serializes_snake_case() {
        let json = serde_json::to_string(&SkipReason::BelowGasReserve).unwrap();
        assert_eq!(json, "\"below_gas_reserve\"");
    }

    #[test]
    fn test_outcome_tagging() {
        let outcome = TradeOutcome::Skipped {
            reason: SkipReason::NoStableBalance,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "skipped");
        assert_eq!(json["reason"], "no_stable_balance");
    }

    #[test]
    fn test_receipt_serialization() {
        let receipt = TradeReceipt {
            trade_id: "t-1".to_string(),
            action: "sell".to_string(),
            input_mint: crate::constants::mints::SOL.to_string(),
            output_mint: crate::constants::mints::USDC.to_string(),
            amount_in: 1_000_000_000,
            quoted_out: 142_000_000,
            signature: "sig".to_string(),
            confirmed_at: Utc::now(),
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["amount_in"], 1_000_000_000u64);
        assert_eq!(json["action"], "sell");
    }
}
