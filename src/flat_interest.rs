//! Flat interest loans: the total interest is fixed at origination and the
//! instalment never changes. With the Rule of 78 the interest part of each
//! instalment is front-loaded, otherwise it is spread evenly.
//!
//! Each period is calculated on its own. Rounding drift across periods is
//! not corrected here: a caller that needs the total interest charged to
//! match [`calculate_flat_total_interest`] exactly must charge the residual
//! in the final period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rounding::round_half_up;
use crate::types::{Money, Rate, RepaymentDueResult};

/// Loan state for one flat interest due calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatInterestInput {
    /// Outstanding principal; caps the principal due.
    pub remaining_principal: Money,
    /// Principal at origination, the basis for the total interest.
    pub original_principal: Money,
    /// Nominal annual rate as a decimal.
    pub annual_interest_rate: Rate,
    /// Decimal places for every amount due.
    pub precision: u32,
    /// Original term in months. Must be non-zero.
    pub total_term: u32,
    /// Remaining instalments including this one. Weights the Rule of 78 share.
    pub remaining_term: u32,
    /// Front-load interest with the Rule of 78 instead of spreading it evenly.
    pub use_rule_of_78: bool,
}

/// Interest charged over the whole original term of a flat interest loan.
///
/// # Arguments
///
/// * `original_principal` - Principal at origination.
/// * `annual_interest_rate` - Nominal annual rate as a decimal.
/// * `total_term` - Original term in months.
/// * `precision` - Decimal places of the result.
pub fn calculate_flat_total_interest(
    original_principal: Money,
    annual_interest_rate: Rate,
    total_term: u32,
    precision: u32,
) -> Money {
    round_half_up(
        original_principal * annual_interest_rate * Decimal::from(total_term) / Decimal::from(12),
        precision,
    )
}

/// Calculates the amounts due for a flat interest loan.
///
/// The EMI is the original principal plus the total interest, divided evenly
/// over the original term. The interest share is either even or weighted by
/// the remaining term (Rule of 78), and the principal share is whatever is
/// left of the EMI, capped at the remaining principal. Flat interest has no
/// accrual step, so both accrued interest fields equal the interest due.
///
/// # Arguments
///
/// * `input` - The loan state for this period, see [`FlatInterestInput`].
pub fn calculate_flat_interest_repayment(input: &FlatInterestInput) -> RepaymentDueResult {
    let precision = input.precision;
    let total_term = Decimal::from(input.total_term);
    let total_interest = calculate_flat_total_interest(
        input.original_principal,
        input.annual_interest_rate,
        input.total_term,
        precision,
    );

    let emi = round_half_up((input.original_principal + total_interest) / total_term, precision);

    let interest_due = if input.use_rule_of_78 {
        // Sum of the digits 1..=N over the original term.
        let sum_of_digits = total_term * (total_term + Decimal::ONE) / Decimal::TWO;
        round_half_up(
            total_interest * Decimal::from(input.remaining_term) / sum_of_digits,
            precision,
        )
    } else {
        round_half_up(total_interest / total_term, precision)
    };

    let principal_due = (emi - interest_due).min(input.remaining_principal);

    RepaymentDueResult {
        emi,
        interest_due,
        accrued_interest: interest_due,
        accrued_interest_excluding_overpayment: interest_due,
        principal_due_excluding_overpayment: principal_due,
        principal_excess: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(
        remaining_principal: Money,
        remaining_term: u32,
        use_rule_of_78: bool,
    ) -> FlatInterestInput {
        FlatInterestInput {
            remaining_principal,
            original_principal: dec!(10000),
            annual_interest_rate: dec!(0.12),
            precision: 2,
            total_term: 12,
            remaining_term,
            use_rule_of_78,
        }
    }

    #[test]
    fn test_total_interest_is_flat_over_original_term() {
        assert_eq!(calculate_flat_total_interest(dec!(10000), dec!(0.12), 12, 2), dec!(1200.00));
        assert_eq!(calculate_flat_total_interest(dec!(5000), dec!(0.035), 7, 2), dec!(102.08));
    }

    #[test]
    fn test_straight_line_interest() {
        let result = calculate_flat_interest_repayment(&input(dec!(10000), 12, false));
        assert_eq!(result.emi, dec!(933.33));
        assert_eq!(result.interest_due, dec!(100.00));
        assert_eq!(result.principal_due_excluding_overpayment, dec!(833.33));
        assert_eq!(result.accrued_interest, dec!(100.00));
        assert_eq!(result.accrued_interest_excluding_overpayment, dec!(100.00));
        assert_eq!(result.principal_excess, dec!(0));
    }

    #[test]
    fn test_rule_of_78_front_loads_interest() {
        let first = calculate_flat_interest_repayment(&input(dec!(10000), 12, true));
        assert_eq!(first.emi, dec!(933.33));
        // 1200 * 12 / 78
        assert_eq!(first.interest_due, dec!(184.62));
        assert_eq!(first.principal_due_excluding_overpayment, dec!(748.71));

        let last = calculate_flat_interest_repayment(&input(dec!(917.95), 1, true));
        // 1200 * 1 / 78
        assert_eq!(last.interest_due, dec!(15.38));
        assert_eq!(last.principal_due_excluding_overpayment, dec!(917.95));
        assert!(first.interest_due > last.interest_due);
    }

    #[test]
    fn test_principal_due_capped_at_remaining_principal() {
        let result = calculate_flat_interest_repayment(&input(dec!(12.34), 1, false));
        assert_eq!(result.principal_due_excluding_overpayment, dec!(12.34));
    }

    #[test]
    fn test_rule_of_78_interest_sums_close_to_total() {
        let total: Decimal = (1..=12)
            .rev()
            .map(|remaining| {
                calculate_flat_interest_repayment(&input(dec!(10000), remaining, true)).interest_due
            })
            .sum();
        assert!((total - dec!(1200)).abs() <= dec!(0.12));
    }
}
