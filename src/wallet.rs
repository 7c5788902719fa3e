//! Wallet key material
//!
//! The signing keypair is supplied through the environment as a
//! hex-encoded 64-byte Solana keypair (32 secret + 32 public). A missing
//! or malformed key is fatal at startup.

use secrecy::{ExposeSecret, SecretString};
use solana_sdk::signature::Keypair;

use crate::error::{AppError, AppResult};

/// Environment variable holding the hex-encoded keypair
pub const WALLET_KEY_ENV: &str = "HELMSMAN_WALLET_KEY";

/// Load the signing keypair from the environment
pub fn load_keypair_from_env() -> AppResult<Keypair> {
    let raw = std::env::var(WALLET_KEY_ENV)
        .map_err(|_| AppError::Wallet(format!("{} environment variable not set", WALLET_KEY_ENV)))?;

    // The Keypair itself must outlive this scope for signing; only the hex
    // source material is wrapped.
    let secret = SecretString::new(raw);
    decode_keypair(secret.expose_secret())
}

/// Decode a hex-encoded 64-byte keypair
pub(crate) fn decode_keypair(key_hex: &str) -> AppResult<Keypair> {
    let key_bytes = hex::decode(key_hex.trim())
        .map_err(|e| AppError::Wallet(format!("Invalid private key hex: {}", e)))?;

    if key_bytes.len() != 64 {
        return Err(AppError::Wallet(format!(
            "Invalid keypair length (expected 64 bytes, got {})",
            key_bytes.len()
        )));
    }

    Keypair::try_from(key_bytes.as_slice()).map_err(|e| {
        AppError::Wallet(format!(
            "Failed to build keypair from decoded bytes: {:?}",
            e
        ))
    })
}
