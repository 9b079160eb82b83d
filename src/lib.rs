//! `loan_amortisation` calculates what a loan owes on each repayment day.
//!
//! Given the loan's current state (outstanding principal, accrued interest,
//! overpayments, and what changed since the previous repayment day) it works
//! out the principal due, the interest due and the instalment (EMI) for the
//! period. Three amortisation methods are supported:
//! - **Declining principal**: a fixed EMI split into interest on the
//!   outstanding balance and principal. The EMI is recalculated when the
//!   rate changes, after a repayment holiday, or after an overpayment,
//!   depending on the product's preferences.
//! - **Interest only**: interest every period, principal as a bullet at the
//!   end of the term.
//! - **Flat interest**: interest fixed at origination, spread evenly or
//!   front-loaded with the Rule of 78.
//!
//! Every calculation is a pure function of its input. Nothing is kept between
//! calls, so the caller supplies the previous period's values.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use loan_amortisation::{
//!     calculate_declining_principal_repayment, DecliningPrincipalInput,
//!     EmiRecalculationCondition, HolidayImpactPreference, OverpaymentImpactPreference,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), anyhow::Error> {
//!     let condition = EmiRecalculationCondition {
//!         holiday_impact_preference: "increase_term".parse()?,
//!         previous_due_amount_blocked: false,
//!         overpayment_impact_preference: OverpaymentImpactPreference::ReduceTerm,
//!         previous_overpayment_amount: dec!(0),
//!         was_previous_interest_rate_fixed: true,
//!         is_current_interest_rate_fixed: true,
//!         previous_repayment_day_schedule_date: None,
//!         last_rate_change_date: Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap(),
//!     };
//!     assert_eq!(condition.holiday_impact_preference, HolidayImpactPreference::IncreaseTerm);
//!
//!     let input = DecliningPrincipalInput {
//!         precision: 2,
//!         actual_principal: dec!(300000),
//!         principal_with_capitalised_interest: dec!(300000),
//!         remaining_term: dec!(48),
//!         monthly_interest_rate: dec!(0.031) / dec!(12),
//!         emi: dec!(0),
//!         current_overpayment_amount: dec!(0),
//!         is_last_payment_date: false,
//!         principal_excess: dec!(0),
//!         interest_accrued: dec!(789.86295),
//!         accrued_interest_excluding_overpayment: dec!(789.86295),
//!         accrued_additional_interest: dec!(0),
//!         emi_recalculation_condition: condition,
//!         lump_sum_amount: None,
//!         predefined_emi: false,
//!     };
//!
//!     let result = calculate_declining_principal_repayment(&input);
//!     println!("EMI:           {}", result.emi);
//!     println!("Principal due: {}", result.principal_due_excluding_overpayment);
//!     println!("Interest due:  {}", result.interest_due);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod declining_principal;
pub mod emi;
pub mod error;
pub mod flat_interest;
pub mod interest_only;
pub mod method;
pub mod rounding;
pub mod types;

pub use config::{LoanParameters, LoanPeriodState, PreviousPeriodState};
pub use declining_principal::{DecliningPrincipalInput, calculate_declining_principal_repayment};
pub use emi::{
    EmiRecalculationCondition, EmiRecalculationTrigger, HolidayImpactPreference,
    OverpaymentImpactPreference, calculate_emi, should_recalculate_emi,
};
pub use error::{AmortisationError, AmortisationResult};
pub use flat_interest::{
    FlatInterestInput, calculate_flat_interest_repayment, calculate_flat_total_interest,
};
pub use interest_only::{InterestOnlyInput, calculate_interest_only_repayment};
pub use method::{AmortisationMethod, RepaymentDueInput, calculate_repayment_due};
pub use rounding::{RoundingMode, RoundingSpec, round_decimal, round_half_up};
pub use types::{Money, Rate, RepaymentDueResult};
