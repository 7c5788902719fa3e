use rust_decimal::prelude::*;

/// Convert SOL (f64) to lamports (u64) via Decimal to avoid float precision loss
pub fn sol_to_lamports(sol: f64) -> u64 {
    // 1 SOL = 1,000,000,000 lamports
    let sol_decimal = Decimal::from_f64_retain(sol).unwrap_or(Decimal::ZERO);
    let multiplier = Decimal::new(1_000_000_000, 0);

    (sol_decimal * multiplier).to_u64().unwrap_or(0)
}

/// Convert lamports (u64) back to SOL (f64) for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    let lamports_dec = Decimal::from(lamports);
    let divisor = Decimal::new(1_000_000_000, 0);

    (lamports_dec / divisor).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(sol_to_lamports(1.0), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.201), 201_000_000);
        assert_eq!(sol_to_lamports(0.0), 0);
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
        assert_eq!(lamports_to_sol(0), 0.0);
    }

    #[test]
    fn test_round_trip_preserves_small_amounts() {
        let lamports = sol_to_lamports(0.000000001);
        assert_eq!(lamports, 1);
    }
}
