//! Declining principal loans: a level EMI split each period into the interest
//! accrued on the outstanding balance and principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::emi::{EmiRecalculationCondition, OverpaymentImpactPreference, calculate_emi};
use crate::rounding::round_half_up;
use crate::types::{Money, Rate, RepaymentDueResult};

/// Loan state for one declining principal due calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecliningPrincipalInput {
    /// Decimal places for every amount due.
    pub precision: u32,
    /// Outstanding principal, net of overpayments.
    pub actual_principal: Money,
    /// Outstanding principal plus capitalised interest, ignoring overpayments.
    pub principal_with_capitalised_interest: Money,
    /// Remaining instalments. Zero or less means the term has run out.
    pub remaining_term: Decimal,
    /// Nominal annual rate divided by twelve.
    pub monthly_interest_rate: Rate,
    /// The current EMI, or zero if none has been set.
    pub emi: Money,
    /// Cumulative overpayments made so far.
    pub current_overpayment_amount: Money,
    /// This is the final repayment day of the loan.
    pub is_last_payment_date: bool,
    /// Principal excess carried from the previous period. Not used by the
    /// calculation; callers keep it alongside the rest of the loan state.
    pub principal_excess: Money,
    /// Interest accrued on the actual, overpayment-reduced principal.
    pub interest_accrued: Money,
    /// Interest that would have accrued had no overpayment been made.
    pub accrued_interest_excluding_overpayment: Money,
    /// Interest accrued beyond one period before the first repayment day.
    pub accrued_additional_interest: Money,
    /// What changed since the previous due-calculation event.
    pub emi_recalculation_condition: EmiRecalculationCondition,
    /// Balloon amount left outstanding at the end of the term.
    #[serde(default)]
    pub lump_sum_amount: Option<Money>,
    /// The EMI was agreed up front and is never recalculated.
    #[serde(default)]
    pub predefined_emi: bool,
}

impl DecliningPrincipalInput {
    /// Principal the EMI is amortised over. Overpayments only reduce the
    /// basis when the product reduces the EMI for them.
    fn emi_principal_basis(&self) -> Money {
        let condition = &self.emi_recalculation_condition;
        if condition.overpayment_impact_preference == OverpaymentImpactPreference::ReduceEmi
            && !self.current_overpayment_amount.is_zero()
        {
            self.actual_principal
        } else {
            self.principal_with_capitalised_interest
        }
    }
}

/// Calculates the amounts due for a declining principal (EMI) loan.
///
/// Three regimes, checked in order:
/// - term exhausted: all outstanding principal is due at once,
/// - zero interest rate: principal is repaid in equal straight-line parts,
/// - otherwise the EMI is recalculated if needed and split into interest and
///   principal.
///
/// Whatever the regime, principal due never exceeds `actual_principal`, and
/// on the last payment date it is exactly `actual_principal`.
///
/// # Arguments
///
/// * `input` - The loan state for this period, see [`DecliningPrincipalInput`].
pub fn calculate_declining_principal_repayment(
    input: &DecliningPrincipalInput,
) -> RepaymentDueResult {
    let precision = input.precision;
    let mut interest_due = round_half_up(input.interest_accrued, precision);
    let mut accrued_interest_excluding_overpayment =
        round_half_up(input.accrued_interest_excluding_overpayment, precision);

    let emi;
    let mut principal_due;
    let mut principal_excess = Decimal::ZERO;

    if input.remaining_term <= Decimal::ZERO {
        log::debug!(
            "term exhausted, collecting outstanding principal {}",
            input.actual_principal
        );
        emi = input.actual_principal;
        principal_due = input.actual_principal;
    } else if input.monthly_interest_rate.is_zero() {
        emi = round_half_up(input.actual_principal / input.remaining_term, precision);
        log::debug!("zero interest rate, straight-line principal due {emi}");
        principal_due = emi;
    } else {
        emi = current_emi(input);
        let additional_interest = round_half_up(input.accrued_additional_interest, precision);

        if input.predefined_emi && emi < interest_due {
            log::debug!(
                "EMI {emi} does not cover interest due {interest_due}, deferring principal"
            );
            interest_due = emi;
            accrued_interest_excluding_overpayment = emi;
            principal_due = Decimal::ZERO;
        } else {
            let expected_interest = accrued_interest_excluding_overpayment;
            principal_due = emi - (expected_interest - additional_interest);
            principal_excess = expected_interest - interest_due;
        }
    }

    if input.is_last_payment_date || principal_due > input.actual_principal {
        log::debug!("final period, closing out principal {}", input.actual_principal);
        principal_due = input.actual_principal;
        principal_excess = Decimal::ZERO;
    }

    RepaymentDueResult {
        emi,
        interest_due,
        accrued_interest: input.interest_accrued,
        accrued_interest_excluding_overpayment,
        principal_due_excluding_overpayment: principal_due,
        principal_excess,
    }
}

/// The input EMI, or a freshly calculated one if a recalculation trigger fired.
fn current_emi(input: &DecliningPrincipalInput) -> Money {
    if input.predefined_emi {
        return input.emi;
    }
    match input
        .emi_recalculation_condition
        .recalculation_trigger(input.emi, input.current_overpayment_amount)
    {
        Some(trigger) => {
            let emi = calculate_emi(
                input.emi_principal_basis(),
                input.monthly_interest_rate,
                input.remaining_term,
                input.precision,
                input.lump_sum_amount,
            );
            log::debug!("EMI recalculated to {emi} ({trigger:?})");
            emi
        }
        None => input.emi,
    }
}
