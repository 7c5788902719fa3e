/// Solana token mint addresses used by the agent.
pub mod mints {
    /// Wrapped SOL (native SOL as an SPL token)
    pub const SOL: &str = "So11111111111111111111111111111111111111112";
    /// USDC (Circle USD Coin), the default stable counter-asset
    pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
}
