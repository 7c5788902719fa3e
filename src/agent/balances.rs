//! Balance reader
//!
//! Queries the wallet's native lamport balance and its stable-token
//! balance from the RPC node. Balances are fetched fresh per webhook
//! invocation and never cached.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Snapshot of the wallet at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletBalances {
    /// Native SOL balance in lamports
    pub native_lamports: u64,
    /// Stable token balance in token atoms, summed over all token accounts
    pub stable_atoms: u64,
}

/// Fetch the current wallet balances
pub async fn fetch_balances(
    rpc: &RpcClient,
    owner: &Pubkey,
    stable_mint: &Pubkey,
) -> AppResult<WalletBalances> {
    let native_lamports = rpc
        .get_balance(owner)
        .await
        .map_err(|e| AppError::Rpc(format!("Native balance query failed: {}", e)))?;

    let token_accounts = rpc
        .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*stable_mint))
        .await
        .map_err(|e| AppError::Rpc(format!("Token account query failed: {}", e)))?;

    let mut stable_atoms: u64 = 0;
    for keyed in &token_accounts {
        let account = Pubkey::from_str(&keyed.pubkey).map_err(|e| {
            AppError::Rpc(format!(
                "RPC returned invalid token account pubkey '{}': {}",
                keyed.pubkey, e
            ))
        })?;

        let balance = rpc
            .get_token_account_balance(&account)
            .await
            .map_err(|e| AppError::Rpc(format!("Token balance query failed: {}", e)))?;

        let atoms: u64 = balance.amount.parse().map_err(|e| {
            AppError::Rpc(format!(
                "RPC returned unparseable token amount '{}': {}",
                balance.amount, e
            ))
        })?;
        stable_atoms = stable_atoms.saturating_add(atoms);
    }

    Ok(WalletBalances {
        native_lamports,
        stable_atoms,
    })
}
