//! Interest only loans: interest every period, principal as a single bullet
//! on the last repayment date.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rounding::round_half_up;
use crate::types::{Money, RepaymentDueResult};

/// Loan state for one interest only due calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOnlyInput {
    /// Outstanding principal, all due on the last repayment date.
    pub remaining_principal: Money,
    /// Interest accrued since the previous repayment day.
    pub accrued_interest: Money,
    /// Interest that would have accrued had no overpayment been made.
    pub accrued_interest_excluding_overpayment: Money,
    /// Decimal places for every amount due.
    pub precision: u32,
    /// This is the final repayment day of the loan.
    pub is_last_repayment_date: bool,
}

/// Calculates the amounts due for an interest only loan.
///
/// Interest is due every period; the principal is repaid in one bullet on the
/// last repayment date. There is no EMI, so `emi` and `principal_excess` are
/// always zero.
///
/// # Arguments
///
/// * `input` - The loan state for this period, see [`InterestOnlyInput`].
pub fn calculate_interest_only_repayment(input: &InterestOnlyInput) -> RepaymentDueResult {
    let principal_due = if input.is_last_repayment_date {
        round_half_up(input.remaining_principal, input.precision)
    } else {
        Decimal::ZERO
    };

    RepaymentDueResult {
        emi: Decimal::ZERO,
        interest_due: round_half_up(input.accrued_interest, input.precision),
        accrued_interest: input.accrued_interest,
        accrued_interest_excluding_overpayment: input.accrued_interest_excluding_overpayment,
        principal_due_excluding_overpayment: principal_due,
        principal_excess: Decimal::ZERO,
    }
}
