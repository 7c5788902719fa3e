//! Trade sizing policy
//!
//! Pure decision logic over a fresh balance snapshot. Sells convert whole
//! SOL units strictly above the gas reserve; buys convert the entire
//! stable balance. The reserve itself is never tradable.

use solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::agent::balances::WalletBalances;
use crate::models::{Action, SkipReason};

/// Outcome of policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDecision {
    /// Trade `amount` of the input asset (lamports for sells, token atoms for buys)
    Trade { amount: u64 },
    /// No trade; the reason is reported to the caller as a successful no-op
    Skip { reason: SkipReason },
}

/// Decide whether a signal should trade and for how much
pub fn decide(
    action: Action,
    balances: &WalletBalances,
    gas_reserve_lamports: u64,
) -> TradeDecision {
    match action {
        Action::Sell => {
            if balances.native_lamports <= gas_reserve_lamports {
                return TradeDecision::Skip {
                    reason: SkipReason::BelowGasReserve,
                };
            }

            let spendable = balances.native_lamports - gas_reserve_lamports;
            let whole_units = spendable / LAMPORTS_PER_SOL;
            if whole_units == 0 {
                return TradeDecision::Skip {
                    reason: SkipReason::NoWholeUnit,
                };
            }

            TradeDecision::Trade {
                amount: whole_units * LAMPORTS_PER_SOL,
            }
        }
        Action::Buy => {
            if balances.stable_atoms == 0 {
                return TradeDecision::Skip {
                    reason: SkipReason::NoStableBalance,
                };
            }

            TradeDecision::Trade {
                amount: balances.stable_atoms,
            }
        }
    }
}
