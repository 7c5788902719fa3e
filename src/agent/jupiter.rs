//! Jupiter aggregator client
//!
//! Fetches swap quotes and the structured instruction set to execute them.
//! Uses the /swap-instructions endpoint rather than /swap so the agent
//! assembles and signs the transaction itself instead of deserializing a
//! prebuilt one.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

use crate::config::JupiterConfig;
use crate::error::{AppError, AppResult};

/// HTTP client for the Jupiter quote and swap-instructions API
pub struct JupiterClient {
    http: reqwest::Client,
    api_url: String,
    slippage_bps: u16,
}

/// Swap quote
///
/// Mints and amounts are typed; route plan, price impact and the rest of
/// the response are opaque to this system and passed back verbatim on the
/// swap-instructions request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "inputMint")]
    pub input_mint: String,
    #[serde(rename = "outputMint")]
    pub output_mint: String,
    #[serde(rename = "inAmount")]
    pub in_amount: String,
    #[serde(rename = "outAmount")]
    pub out_amount: String,
    /// Route metadata carried through untouched
    #[serde(flatten)]
    pub route: serde_json::Value,
}

impl QuoteResponse {
    /// Promised output amount in atomic units; zero if unparseable
    pub fn out_amount_atoms(&self) -> u64 {
        self.out_amount.parse().unwrap_or(0)
    }
}

/// A single instruction as returned by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionData {
    #[serde(rename = "programId")]
    pub program_id: String,
    #[serde(default)]
    pub accounts: Vec<AccountMetaData>,
    /// Base64-encoded instruction payload
    pub data: String,
}

/// Account metadata for an aggregator instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMetaData {
    pub pubkey: String,
    #[serde(rename = "isSigner")]
    pub is_signer: bool,
    #[serde(rename = "isWritable")]
    pub is_writable: bool,
}

/// Instruction set for one swap, grouped the way the aggregator returns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwapInstructions {
    #[serde(rename = "computeBudgetInstructions", default)]
    pub compute_budget_instructions: Vec<InstructionData>,
    #[serde(rename = "setupInstructions", default)]
    pub setup_instructions: Vec<InstructionData>,
    #[serde(rename = "swapInstruction", default)]
    pub swap_instruction: Option<InstructionData>,
    #[serde(rename = "cleanupInstruction", default)]
    pub cleanup_instruction: Option<InstructionData>,
}

impl SwapInstructions {
    /// Flatten into execution order; absent entries drop out silently
    pub fn flatten(self) -> Vec<InstructionData> {
        let mut ordered = self.compute_budget_instructions;
        ordered.extend(self.setup_instructions);
        ordered.extend(self.swap_instruction);
        ordered.extend(self.cleanup_instruction);
        ordered
    }
}

/// Request body for the /swap-instructions endpoint
#[derive(Debug, Serialize)]
struct SwapInstructionsRequest {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponse,
    #[serde(rename = "userPublicKey")]
    user_public_key: String,
    #[serde(rename = "wrapAndUnwrapSol")]
    wrap_and_unwrap_sol: bool,
    #[serde(rename = "asLegacyTransaction")]
    as_legacy_transaction: bool,
}

impl JupiterClient {
    /// Create a new client from configuration
    pub fn new(config: &JupiterConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            slippage_bps: config.slippage_bps,
        }
    }

    /// Request a quote for converting `amount` of the input asset
    pub async fn quote(
        &self,
        input_mint: &Pubkey,
        output_mint: &Pubkey,
        amount: u64,
    ) -> AppResult<QuoteResponse> {
        let url = format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.api_url, input_mint, output_mint, amount, self.slippage_bps
        );

        tracing::debug!(url = %url, "Requesting swap quote");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Quote request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Quote API returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse quote: {}", e)))
    }

    /// Request the executable instruction set for a quote
    pub async fn swap_instructions(
        &self,
        quote: QuoteResponse,
        user_public_key: &Pubkey,
    ) -> AppResult<SwapInstructions> {
        let url = format!("{}/swap-instructions", self.api_url);
        let payload = SwapInstructionsRequest {
            quote_response: quote,
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol: true,
            as_legacy_transaction: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Swap instructions request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Swap instructions API returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse swap instructions: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_carries_route_metadata() {
        let raw = json!({
            "inputMint": "So11111111111111111111111111111111111111112",
            "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "inAmount": "1000000000",
            "outAmount": "142358113",
            "priceImpactPct": "0.01",
            "routePlan": [{"swapInfo": {"label": "Orca"}}]
        });

        let quote: QuoteResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(quote.out_amount_atoms(), 142_358_113);

        // Opaque fields survive a round trip back into the swap request
        let round_trip = serde_json::to_value(&quote).unwrap();
        assert_eq!(round_trip["priceImpactPct"], "0.01");
        assert_eq!(round_trip["routePlan"][0]["swapInfo"]["label"], "Orca");
    }

    #[test]
    fn test_out_amount_unparseable_is_zero() {
        let quote = QuoteResponse {
            input_mint: String::new(),
            output_mint: String::new(),
            in_amount: "1".to_string(),
            out_amount: "not-a-number".to_string(),
            route: serde_json::Value::Null,
        };
        assert_eq!(quote.out_amount_atoms(), 0);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let ix = |name: &str| InstructionData {
            program_id: name.to_string(),
            accounts: vec![],
            data: String::new(),
        };

        let set = SwapInstructions {
            compute_budget_instructions: vec![ix("budget")],
            setup_instructions: vec![ix("setup-1"), ix("setup-2")],
            swap_instruction: Some(ix("swap")),
            cleanup_instruction: Some(ix("cleanup")),
        };

        let ordered: Vec<String> = set.flatten().into_iter().map(|i| i.program_id).collect();
        assert_eq!(ordered, ["budget", "setup-1", "setup-2", "swap", "cleanup"]);
    }

    #[test]
    fn test_flatten_drops_missing_entries() {
        let set: SwapInstructions = serde_json::from_value(json!({
            "setupInstructions": [],
            "swapInstruction": null,
            "cleanupInstruction": null
        }))
        .unwrap();

        assert!(set.flatten().is_empty());
    }

    #[test]
    fn test_instruction_deserialization() {
        let raw = json!({
            "programId": "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4",
            "accounts": [
                {"pubkey": "So11111111111111111111111111111111111111112", "isSigner": false, "isWritable": true}
            ],
            "data": "AQID"
        });

        let ix: InstructionData = serde_json::from_value(raw).unwrap();
        assert_eq!(ix.accounts.len(), 1);
        assert!(ix.accounts[0].is_writable);
        assert!(!ix.accounts[0].is_signer);
    }
}
