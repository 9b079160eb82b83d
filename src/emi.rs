//! EMI (equated monthly instalment) formula and the rules deciding when an
//! existing EMI has to be recalculated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::AmortisationError;
use crate::rounding::round_half_up;
use crate::types::{Money, Rate};

/// What a repayment holiday does to the rest of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum HolidayImpactPreference {
    IncreaseEmi,
    IncreaseTerm,
}

/// What an overpayment does to the rest of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum OverpaymentImpactPreference {
    ReduceEmi,
    ReduceTerm,
}

impl FromStr for HolidayImpactPreference {
    type Err = AmortisationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCREASE_EMI" => Ok(HolidayImpactPreference::IncreaseEmi),
            "INCREASE_TERM" => Ok(HolidayImpactPreference::IncreaseTerm),
            _ => Err(AmortisationError::unknown("holiday_impact_preference", s)),
        }
    }
}

impl TryFrom<String> for HolidayImpactPreference {
    type Error = AmortisationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for HolidayImpactPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayImpactPreference::IncreaseEmi => f.write_str("INCREASE_EMI"),
            HolidayImpactPreference::IncreaseTerm => f.write_str("INCREASE_TERM"),
        }
    }
}

impl FromStr for OverpaymentImpactPreference {
    type Err = AmortisationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REDUCE_EMI" => Ok(OverpaymentImpactPreference::ReduceEmi),
            "REDUCE_TERM" => Ok(OverpaymentImpactPreference::ReduceTerm),
            _ => Err(AmortisationError::unknown("overpayment_impact_preference", s)),
        }
    }
}

impl TryFrom<String> for OverpaymentImpactPreference {
    type Error = AmortisationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OverpaymentImpactPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverpaymentImpactPreference::ReduceEmi => f.write_str("REDUCE_EMI"),
            OverpaymentImpactPreference::ReduceTerm => f.write_str("REDUCE_TERM"),
        }
    }
}

/// Loan state compared against the previous due-calculation event.
///
/// The caller persists the previous-period values and fills this in; the
/// engine keeps nothing between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiRecalculationCondition {
    /// Effect of a repayment holiday on the remaining instalments.
    pub holiday_impact_preference: HolidayImpactPreference,
    /// The previous due amount was blocked by a repayment holiday.
    pub previous_due_amount_blocked: bool,
    /// Effect of an overpayment on the remaining instalments.
    pub overpayment_impact_preference: OverpaymentImpactPreference,
    /// Cumulative overpayment as of the previous period.
    pub previous_overpayment_amount: Money,
    /// The interest rate was fixed at the previous event.
    pub was_previous_interest_rate_fixed: bool,
    /// The interest rate is fixed now.
    pub is_current_interest_rate_fixed: bool,
    /// Previous repayment day schedule run. Without it a rate change never
    /// triggers a recalculation.
    #[serde(default)]
    pub previous_repayment_day_schedule_date: Option<DateTime<Utc>>,
    /// When the interest rate last changed.
    pub last_rate_change_date: DateTime<Utc>,
}

/// Why an EMI is being recalculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmiRecalculationTrigger {
    /// No EMI has been set yet.
    EmiNotSet,
    /// A variable rate changed since the previous repayment day, or the rate
    /// switched between fixed and variable.
    RateChanged,
    /// The previous period was a repayment holiday and the product spreads it
    /// over the remaining instalments.
    RepaymentHoliday,
    /// A new overpayment arrived and the product reduces the EMI.
    Overpayment,
}

impl EmiRecalculationCondition {
    fn rate_changed(&self) -> bool {
        if self.is_current_interest_rate_fixed {
            return false;
        }
        match self.previous_repayment_day_schedule_date {
            Some(previous) => {
                self.last_rate_change_date > previous
                    || self.was_previous_interest_rate_fixed != self.is_current_interest_rate_fixed
            }
            None => false,
        }
    }

    /// The first trigger that applies, if any.
    pub fn recalculation_trigger(
        &self,
        emi: Money,
        current_overpayment_amount: Money,
    ) -> Option<EmiRecalculationTrigger> {
        if emi.is_zero() {
            Some(EmiRecalculationTrigger::EmiNotSet)
        } else if self.rate_changed() {
            Some(EmiRecalculationTrigger::RateChanged)
        } else if self.previous_due_amount_blocked
            && self.holiday_impact_preference == HolidayImpactPreference::IncreaseEmi
        {
            Some(EmiRecalculationTrigger::RepaymentHoliday)
        } else if self.overpayment_impact_preference == OverpaymentImpactPreference::ReduceEmi
            && current_overpayment_amount != self.previous_overpayment_amount
        {
            Some(EmiRecalculationTrigger::Overpayment)
        } else {
            None
        }
    }
}

/// Whether the EMI must be recomputed this period. A predefined EMI is never
/// recalculated.
pub fn should_recalculate_emi(
    condition: &EmiRecalculationCondition,
    emi: Money,
    current_overpayment_amount: Money,
    predefined_emi: bool,
) -> bool {
    !predefined_emi
        && condition
            .recalculation_trigger(emi, current_overpayment_amount)
            .is_some()
}

/// Calculates the instalment that amortises `principal` over `remaining_term`
/// periods, leaving `lump_sum_amount` outstanding at the end.
///
/// The formula is: EMI = (P - L / (1 + R)^N) * R * (1 + R)^N / ((1 + R)^N - 1)
///
/// With no lump sum this is the standard annuity payment. The rate must be
/// non-zero and the term positive.
///
/// # Arguments
///
/// * `principal` - The principal to amortise.
/// * `monthly_interest_rate` - The periodic rate as a decimal (not percentage).
/// * `remaining_term` - Number of instalments left; may be fractional.
/// * `precision` - Decimal places of the result, rounded half-up.
/// * `lump_sum_amount` - Balloon left outstanding after the last instalment.
///
/// # Examples
///
/// ```rust
/// use loan_amortisation::calculate_emi;
/// use rust_decimal_macros::dec;
///
/// let emi = calculate_emi(dec!(300000), dec!(0.031) / dec!(12), dec!(48), 2, None);
/// assert_eq!(emi, dec!(6653.57));
/// ```
pub fn calculate_emi(
    principal: Money,
    monthly_interest_rate: Rate,
    remaining_term: Decimal,
    precision: u32,
    lump_sum_amount: Option<Money>,
) -> Money {
    let lump_sum = lump_sum_amount.unwrap_or(Decimal::ZERO);
    let growth = (Decimal::ONE + monthly_interest_rate).powd(remaining_term);

    let emi = (principal - lump_sum / growth) * monthly_interest_rate * growth
        / (growth - Decimal::ONE);

    round_half_up(emi, precision)
}
