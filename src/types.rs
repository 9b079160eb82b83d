//! Types shared by every strategy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amounts. Always `Decimal`, never `f64`.
pub type Money = Decimal;

/// Rates expressed as decimals (0.031 = 3.1%).
pub type Rate = Decimal;

/// Amounts due for one repayment period.
///
/// Every strategy returns this same shape so callers can build postings
/// without caring which amortisation method produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentDueResult {
    /// The instalment for the period. Zero for interest only loans.
    pub emi: Money,
    /// Interest to move from accrued to due.
    pub interest_due: Money,
    /// Interest accrued on the actual principal, as received.
    pub accrued_interest: Money,
    /// Interest that would have accrued had no overpayment been made.
    pub accrued_interest_excluding_overpayment: Money,
    /// Principal to move to due.
    pub principal_due_excluding_overpayment: Money,
    /// Interest saved by past overpayments, reallocated to principal.
    pub principal_excess: Money,
}
