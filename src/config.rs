//! Product parameters the due calculation reads.
//!
//! These come from the loan's configuration as JSON. Values are parsed into
//! closed enums here; nothing else is checked. [`LoanParameters`] then picks
//! the strategy input for the loan's amortisation method.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::declining_principal::DecliningPrincipalInput;
use crate::emi::{EmiRecalculationCondition, HolidayImpactPreference, OverpaymentImpactPreference};
use crate::error::AmortisationResult;
use crate::flat_interest::FlatInterestInput;
use crate::interest_only::InterestOnlyInput;
use crate::method::{AmortisationMethod, RepaymentDueInput, calculate_repayment_due};
use crate::types::{Money, Rate, RepaymentDueResult};

fn default_precision() -> u32 {
    2
}

/// Loan product parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Strategy used for every due calculation on the loan.
    pub amortisation_method: AmortisationMethod,
    /// Decimal places for amounts due. Defaults to 2.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Effect of a repayment holiday on the remaining instalments.
    pub holiday_impact_preference: HolidayImpactPreference,
    /// Effect of an overpayment on the remaining instalments.
    pub overpayment_impact_preference: OverpaymentImpactPreference,
}

/// Values the caller persisted at the previous due-calculation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousPeriodState {
    /// The previous due amount was blocked by a repayment holiday.
    pub due_amount_blocked: bool,
    /// Cumulative overpayment at the previous event.
    pub overpayment_amount: Money,
    /// The interest rate was fixed at the previous event.
    pub interest_rate_fixed: bool,
    /// Date of the previous repayment day schedule run, if there was one.
    #[serde(default)]
    pub repayment_day_schedule_date: Option<DateTime<Utc>>,
}

/// Loan balances and terms on a repayment day, read from the caller's ledger.
///
/// Holds everything any strategy needs; each method reads only its own part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPeriodState {
    /// Outstanding principal, net of overpayments.
    pub actual_principal: Money,
    /// Outstanding principal plus capitalised interest, ignoring overpayments.
    pub principal_with_capitalised_interest: Money,
    /// Principal at origination.
    pub original_principal: Money,
    /// Nominal annual rate as a decimal.
    pub annual_interest_rate: Rate,
    /// Original term in months.
    pub total_term: u32,
    /// Remaining instalments including this one.
    pub remaining_term: u32,
    /// The current EMI, or zero if none has been set.
    pub emi: Money,
    /// Cumulative overpayments made so far.
    pub current_overpayment_amount: Money,
    /// This is the final repayment day of the loan.
    pub is_last_payment_date: bool,
    /// Principal excess carried from the previous period.
    pub principal_excess: Money,
    /// Interest accrued on the actual principal.
    pub interest_accrued: Money,
    /// Interest that would have accrued had no overpayment been made.
    pub accrued_interest_excluding_overpayment: Money,
    /// Interest accrued beyond one period before the first repayment day.
    pub accrued_additional_interest: Money,
    /// Balloon amount due at the end of the term.
    #[serde(default)]
    pub lump_sum_amount: Option<Money>,
}

impl LoanParameters {
    /// Parses parameters from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AmortisationError::Serialization`] if the JSON is
    /// malformed or names an unknown method or preference.
    pub fn from_json(json: &str) -> AmortisationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the EMI recalculation condition from these parameters and the
    /// persisted previous-period state.
    ///
    /// # Arguments
    ///
    /// * `previous` - State saved at the previous due-calculation event.
    /// * `is_current_interest_rate_fixed` - Whether the rate is fixed now.
    /// * `last_rate_change_date` - When the interest rate last changed.
    pub fn recalculation_condition(
        &self,
        previous: &PreviousPeriodState,
        is_current_interest_rate_fixed: bool,
        last_rate_change_date: DateTime<Utc>,
    ) -> EmiRecalculationCondition {
        EmiRecalculationCondition {
            holiday_impact_preference: self.holiday_impact_preference,
            previous_due_amount_blocked: previous.due_amount_blocked,
            overpayment_impact_preference: self.overpayment_impact_preference,
            previous_overpayment_amount: previous.overpayment_amount,
            was_previous_interest_rate_fixed: previous.interest_rate_fixed,
            is_current_interest_rate_fixed,
            previous_repayment_day_schedule_date: previous.repayment_day_schedule_date,
            last_rate_change_date,
        }
    }

    /// Builds the strategy input for this loan's amortisation method.
    ///
    /// Flat interest methods take `use_rule_of_78` from the method, and a
    /// minimum repayment with balloon loan is a declining principal loan with
    /// a predefined EMI. Every strategy rounds to [`LoanParameters::precision`].
    ///
    /// # Arguments
    ///
    /// * `state` - Loan balances and terms on the repayment day.
    /// * `condition` - What changed since the previous due-calculation event.
    pub fn repayment_due_input(
        &self,
        state: &LoanPeriodState,
        condition: &EmiRecalculationCondition,
    ) -> RepaymentDueInput {
        let method = self.amortisation_method;
        if method.is_flat_interest() {
            return FlatInterestInput {
                remaining_principal: state.actual_principal,
                original_principal: state.original_principal,
                annual_interest_rate: state.annual_interest_rate,
                precision: self.precision,
                total_term: state.total_term,
                remaining_term: state.remaining_term,
                use_rule_of_78: method.uses_rule_of_78(),
            }
            .into();
        }

        match method {
            AmortisationMethod::InterestOnly => InterestOnlyInput {
                remaining_principal: state.actual_principal,
                accrued_interest: state.interest_accrued,
                accrued_interest_excluding_overpayment: state
                    .accrued_interest_excluding_overpayment,
                precision: self.precision,
                is_last_repayment_date: state.is_last_payment_date,
            }
            .into(),
            _ => DecliningPrincipalInput {
                precision: self.precision,
                actual_principal: state.actual_principal,
                principal_with_capitalised_interest: state.principal_with_capitalised_interest,
                remaining_term: Decimal::from(state.remaining_term),
                monthly_interest_rate: state.annual_interest_rate / Decimal::from(12),
                emi: state.emi,
                current_overpayment_amount: state.current_overpayment_amount,
                is_last_payment_date: state.is_last_payment_date,
                principal_excess: state.principal_excess,
                interest_accrued: state.interest_accrued,
                accrued_interest_excluding_overpayment: state
                    .accrued_interest_excluding_overpayment,
                accrued_additional_interest: state.accrued_additional_interest,
                emi_recalculation_condition: condition.clone(),
                lump_sum_amount: state.lump_sum_amount,
                predefined_emi: method == AmortisationMethod::MinimumRepaymentWithBalloon,
            }
            .into(),
        }
    }

    /// Calculates the amounts due for one period with this loan's method.
    pub fn calculate_repayment_due(
        &self,
        state: &LoanPeriodState,
        condition: &EmiRecalculationCondition,
    ) -> RepaymentDueResult {
        let input = self.repayment_due_input(state, condition);
        log::debug!("calculating repayment due with {}", self.amortisation_method);
        calculate_repayment_due(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn parameters(amortisation_method: AmortisationMethod) -> LoanParameters {
        LoanParameters {
            amortisation_method,
            precision: 2,
            holiday_impact_preference: HolidayImpactPreference::IncreaseTerm,
            overpayment_impact_preference: OverpaymentImpactPreference::ReduceTerm,
        }
    }

    fn condition() -> EmiRecalculationCondition {
        parameters(AmortisationMethod::DecliningPrincipal).recalculation_condition(
            &PreviousPeriodState {
                due_amount_blocked: false,
                overpayment_amount: dec!(0),
                interest_rate_fixed: true,
                repayment_day_schedule_date: None,
            },
            true,
            Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap(),
        )
    }

    fn state() -> LoanPeriodState {
        LoanPeriodState {
            actual_principal: dec!(300000),
            principal_with_capitalised_interest: dec!(300000),
            original_principal: dec!(300000),
            annual_interest_rate: dec!(0.031),
            total_term: 48,
            remaining_term: 48,
            emi: dec!(0),
            current_overpayment_amount: dec!(0),
            is_last_payment_date: false,
            principal_excess: dec!(0),
            interest_accrued: dec!(789.86295),
            accrued_interest_excluding_overpayment: dec!(789.86295),
            accrued_additional_interest: dec!(0),
            lump_sum_amount: None,
        }
    }

    #[test]
    fn test_parameters_from_json() {
        let params = LoanParameters::from_json(
            r#"{
                "amortisation_method": "Declining_Principal",
                "holiday_impact_preference": "increase_emi",
                "overpayment_impact_preference": "REDUCE_TERM"
            }"#,
        )
        .unwrap();

        assert_eq!(params.amortisation_method, AmortisationMethod::DecliningPrincipal);
        assert_eq!(params.precision, 2);
        assert_eq!(params.holiday_impact_preference, HolidayImpactPreference::IncreaseEmi);
        assert_eq!(
            params.overpayment_impact_preference,
            OverpaymentImpactPreference::ReduceTerm
        );
    }

    #[test]
    fn test_unknown_preference_is_rejected() {
        let result = LoanParameters::from_json(
            r#"{
                "amortisation_method": "interest_only",
                "holiday_impact_preference": "skip",
                "overpayment_impact_preference": "reduce_term"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_recalculation_condition_from_previous_state() {
        let mut params = parameters(AmortisationMethod::DecliningPrincipal);
        params.overpayment_impact_preference = OverpaymentImpactPreference::ReduceEmi;
        let previous = PreviousPeriodState {
            due_amount_blocked: false,
            overpayment_amount: dec!(250),
            interest_rate_fixed: true,
            repayment_day_schedule_date: Some(Utc.with_ymd_and_hms(2020, 3, 5, 0, 1, 0).unwrap()),
        };
        let rate_change = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let condition = params.recalculation_condition(&previous, true, rate_change);
        assert_eq!(condition.previous_overpayment_amount, dec!(250));
        assert!(condition.was_previous_interest_rate_fixed);
        assert_eq!(condition.last_rate_change_date, rate_change);
        assert_eq!(
            condition.overpayment_impact_preference,
            OverpaymentImpactPreference::ReduceEmi
        );
    }

    #[test]
    fn test_declining_principal_method_builds_monthly_rate() {
        let input = parameters(AmortisationMethod::DecliningPrincipal)
            .repayment_due_input(&state(), &condition());

        let RepaymentDueInput::DecliningPrincipal(input) = &input else {
            panic!("expected declining principal input, got {input:?}");
        };
        assert_eq!(input.monthly_interest_rate, dec!(0.031) / dec!(12));
        assert_eq!(input.remaining_term, dec!(48));
        assert!(!input.predefined_emi);
    }

    #[test]
    fn test_balloon_method_routes_to_declining_principal_with_predefined_emi() {
        let params = LoanParameters::from_json(
            r#"{
                "amortisation_method": "minimum_repayment_with_balloon_payment",
                "holiday_impact_preference": "increase_term",
                "overpayment_impact_preference": "reduce_term"
            }"#,
        )
        .unwrap();
        let mut state = state();
        state.emi = dec!(4694.04);
        state.lump_sum_amount = Some(dec!(100000));

        let input = params.repayment_due_input(&state, &condition());
        let RepaymentDueInput::DecliningPrincipal(ref declining) = input else {
            panic!("expected declining principal input, got {input:?}");
        };
        assert!(declining.predefined_emi);
        assert_eq!(declining.lump_sum_amount, Some(dec!(100000)));

        let result = params.calculate_repayment_due(&state, &condition());
        assert_eq!(result.emi, dec!(4694.04));
        assert_eq!(result.principal_due_excluding_overpayment, dec!(3904.18));
    }

    #[test]
    fn test_rule_of_78_method_sets_flag_and_precision() {
        let mut params = parameters(AmortisationMethod::RuleOfSeventyEight);
        params.precision = 3;

        let input = params.repayment_due_input(&state(), &condition());
        let RepaymentDueInput::FlatInterest(flat) = &input else {
            panic!("expected flat interest input, got {input:?}");
        };
        assert!(flat.use_rule_of_78);
        assert_eq!(flat.precision, 3);

        let params = parameters(AmortisationMethod::FlatInterest);
        let RepaymentDueInput::FlatInterest(flat) =
            params.repayment_due_input(&state(), &condition())
        else {
            panic!("expected flat interest input");
        };
        assert!(!flat.use_rule_of_78);
    }

    #[test]
    fn test_interest_only_method() {
        let mut state = state();
        state.is_last_payment_date = true;

        let result = parameters(AmortisationMethod::InterestOnly)
            .calculate_repayment_due(&state, &condition());

        assert_eq!(result.emi, dec!(0));
        assert_eq!(result.interest_due, dec!(789.86));
        assert_eq!(result.principal_due_excluding_overpayment, dec!(300000.00));
    }
}
