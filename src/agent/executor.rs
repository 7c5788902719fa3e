//! Swap executor
//!
//! Translates the aggregator's instruction set into native instructions,
//! assembles a single legacy transaction with the wallet as fee payer,
//! signs it once, submits it once, and waits for the network to confirm
//! at the RPC client's commitment level.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

use crate::agent::jupiter::InstructionData;
use crate::error::{AppError, AppResult};

/// Convert one aggregator instruction into the SDK representation
pub fn convert_instruction(ix: &InstructionData) -> AppResult<Instruction> {
    let program_id = Pubkey::from_str(&ix.program_id)
        .map_err(|e| AppError::Parse(format!("Invalid program id '{}': {}", ix.program_id, e)))?;

    let accounts = ix
        .accounts
        .iter()
        .map(|meta| {
            let pubkey = Pubkey::from_str(&meta.pubkey).map_err(|e| {
                AppError::Parse(format!("Invalid account pubkey '{}': {}", meta.pubkey, e))
            })?;
            Ok(AccountMeta {
                pubkey,
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let data = BASE64
        .decode(&ix.data)
        .map_err(|e| AppError::Parse(format!("Invalid instruction data (base64): {}", e)))?;

    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Convert a batch of instructions, dropping entries that fail translation
pub fn convert_all(raw: &[InstructionData]) -> Vec<Instruction> {
    raw.iter()
        .filter_map(|ix| match convert_instruction(ix) {
            Ok(converted) => Some(converted),
            Err(e) => {
                tracing::warn!(
                    program_id = %ix.program_id,
                    error = %e,
                    "Dropping untranslatable instruction"
                );
                None
            }
        })
        .collect()
}

/// Assemble, sign and submit a transaction, blocking until confirmation
///
/// Returns the transaction signature on success.
pub async fn sign_and_submit(
    rpc: &RpcClient,
    keypair: &Keypair,
    instructions: &[Instruction],
) -> AppResult<String> {
    let blockhash = rpc
        .get_latest_blockhash()
        .await
        .map_err(|e| AppError::Rpc(format!("Failed to get blockhash: {}", e)))?;

    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&keypair.pubkey()),
        &[keypair],
        blockhash,
    );

    let signature = rpc
        .send_and_confirm_transaction(&transaction)
        .await
        .map_err(|e| AppError::Transaction(format!("Submission failed: {}", e)))?;

    Ok(signature.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::jupiter::AccountMetaData;

    fn instruction(program_id: &str, accounts: Vec<AccountMetaData>, data: &str) -> InstructionData {
        InstructionData {
            program_id: program_id.to_string(),
            accounts,
            data: data.to_string(),
        }
    }

    #[test]
    fn test_convert_valid_instruction() {
        let ix = instruction(
            "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4",
            vec![
                AccountMetaData {
                    pubkey: "So11111111111111111111111111111111111111112".to_string(),
                    is_signer: true,
                    is_writable: true,
                },
                AccountMetaData {
                    pubkey: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
                    is_signer: false,
                    is_writable: false,
                },
            ],
            &BASE64.encode(b"route"),
        );

        let converted = convert_instruction(&ix).expect("conversion should succeed");
        assert_eq!(
            converted.program_id.to_string(),
            "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4"
        );
        assert_eq!(converted.accounts.len(), 2);
        assert!(converted.accounts[0].is_signer);
        assert!(!converted.accounts[1].is_writable);
        assert_eq!(converted.data, b"route");
    }

    #[test]
    fn test_convert_rejects_bad_program_id() {
        let ix = instruction("definitely-not-a-pubkey", vec![], &BASE64.encode(b"x"));
        assert!(convert_instruction(&ix).is_err());
    }

    #[test]
    fn test_convert_rejects_bad_account_pubkey() {
        let ix = instruction(
            "11111111111111111111111111111111",
            vec![AccountMetaData {
                pubkey: "%%%".to_string(),
                is_signer: false,
                is_writable: false,
            }],
            &BASE64.encode(b"x"),
        );
        assert!(convert_instruction(&ix).is_err());
    }

    #[test]
    fn test_convert_rejects_bad_base64() {
        let ix = instruction("11111111111111111111111111111111", vec![], "@@not base64@@");
        assert!(convert_instruction(&ix).is_err());
    }

    #[test]
    fn test_convert_handles_empty_accounts_and_data() {
        let ix = instruction("11111111111111111111111111111111", vec![], "");
        let converted = convert_instruction(&ix).unwrap();
        assert!(converted.accounts.is_empty());
        assert!(converted.data.is_empty());
    }

    #[test]
    fn test_convert_all_drops_broken_entries() {
        let batch = vec![
            instruction("11111111111111111111111111111111", vec![], ""),
            instruction("broken", vec![], ""),
            instruction(
                "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4",
                vec![],
                &BASE64.encode(b"ok"),
            ),
        ];

        let converted = convert_all(&batch);
        assert_eq!(converted.len(), 2);
        assert_eq!(
            converted[1].program_id.to_string(),
            "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4"
        );
    }
}
