//! Selecting the strategy for a loan's amortisation method.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::declining_principal::{DecliningPrincipalInput, calculate_declining_principal_repayment};
use crate::error::AmortisationError;
use crate::flat_interest::{FlatInterestInput, calculate_flat_interest_repayment};
use crate::interest_only::{InterestOnlyInput, calculate_interest_only_repayment};
use crate::types::RepaymentDueResult;

/// The `amortisation_method` product parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum AmortisationMethod {
    /// Level EMI split into interest and principal.
    DecliningPrincipal,
    /// Interest every period, principal at the end of the term.
    InterestOnly,
    /// Interest fixed at origination, spread evenly.
    FlatInterest,
    /// Interest fixed at origination, front-loaded with the Rule of 78.
    #[serde(rename = "rule_of_78")]
    RuleOfSeventyEight,
    /// Declining principal with a predefined EMI and a balloon lump sum.
    #[serde(rename = "minimum_repayment_with_balloon_payment")]
    MinimumRepaymentWithBalloon,
}

impl AmortisationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmortisationMethod::DecliningPrincipal => "declining_principal",
            AmortisationMethod::InterestOnly => "interest_only",
            AmortisationMethod::FlatInterest => "flat_interest",
            AmortisationMethod::RuleOfSeventyEight => "rule_of_78",
            AmortisationMethod::MinimumRepaymentWithBalloon => {
                "minimum_repayment_with_balloon_payment"
            }
        }
    }

    /// Flat interest and Rule of 78 loans fix their interest at origination.
    pub fn is_flat_interest(&self) -> bool {
        matches!(
            self,
            AmortisationMethod::FlatInterest | AmortisationMethod::RuleOfSeventyEight
        )
    }

    pub fn uses_rule_of_78(&self) -> bool {
        *self == AmortisationMethod::RuleOfSeventyEight
    }
}

impl fmt::Display for AmortisationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortisationMethod {
    type Err = AmortisationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "declining_principal" => Ok(AmortisationMethod::DecliningPrincipal),
            "interest_only" => Ok(AmortisationMethod::InterestOnly),
            "flat_interest" => Ok(AmortisationMethod::FlatInterest),
            "rule_of_78" => Ok(AmortisationMethod::RuleOfSeventyEight),
            "minimum_repayment_with_balloon_payment" => {
                Ok(AmortisationMethod::MinimumRepaymentWithBalloon)
            }
            _ => Err(AmortisationError::unknown("amortisation_method", s)),
        }
    }
}

impl TryFrom<String> for AmortisationMethod {
    type Error = AmortisationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Input for whichever strategy the loan's amortisation method uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RepaymentDueInput {
    DecliningPrincipal(DecliningPrincipalInput),
    InterestOnly(InterestOnlyInput),
    FlatInterest(FlatInterestInput),
}

impl From<DecliningPrincipalInput> for RepaymentDueInput {
    fn from(input: DecliningPrincipalInput) -> Self {
        RepaymentDueInput::DecliningPrincipal(input)
    }
}

impl From<InterestOnlyInput> for RepaymentDueInput {
    fn from(input: InterestOnlyInput) -> Self {
        RepaymentDueInput::InterestOnly(input)
    }
}

impl From<FlatInterestInput> for RepaymentDueInput {
    fn from(input: FlatInterestInput) -> Self {
        RepaymentDueInput::FlatInterest(input)
    }
}

/// Calculates the amounts due for one period with the matching strategy.
///
/// To choose the strategy from a loan's [`AmortisationMethod`], build the
/// input with [`crate::LoanParameters::repayment_due_input`].
///
/// # Arguments
///
/// * `input` - The strategy input for this period.
pub fn calculate_repayment_due(input: &RepaymentDueInput) -> RepaymentDueResult {
    match input {
        RepaymentDueInput::DecliningPrincipal(input) => {
            calculate_declining_principal_repayment(input)
        }
        RepaymentDueInput::InterestOnly(input) => calculate_interest_only_repayment(input),
        RepaymentDueInput::FlatInterest(input) => calculate_flat_interest_repayment(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("declining_principal", AmortisationMethod::DecliningPrincipal)]
    #[case("INTEREST_ONLY", AmortisationMethod::InterestOnly)]
    #[case("Flat_Interest", AmortisationMethod::FlatInterest)]
    #[case("rule_of_78", AmortisationMethod::RuleOfSeventyEight)]
    #[case(
        "minimum_repayment_with_balloon_payment",
        AmortisationMethod::MinimumRepaymentWithBalloon
    )]
    fn test_parse_amortisation_method(#[case] raw: &str, #[case] expected: AmortisationMethod) {
        let method: AmortisationMethod = raw.parse().unwrap();
        assert_eq!(method, expected);
        assert_eq!(method.as_str().parse::<AmortisationMethod>().unwrap(), method);
    }

    #[test]
    fn test_unknown_method_names_the_field() {
        let err = "balloon".parse::<AmortisationMethod>().unwrap_err();
        assert!(err.to_string().contains("amortisation_method"));
    }

    #[test]
    fn test_flat_interest_methods() {
        assert!(AmortisationMethod::FlatInterest.is_flat_interest());
        assert!(AmortisationMethod::RuleOfSeventyEight.is_flat_interest());
        assert!(!AmortisationMethod::DecliningPrincipal.is_flat_interest());
        assert!(AmortisationMethod::RuleOfSeventyEight.uses_rule_of_78());
        assert!(!AmortisationMethod::FlatInterest.uses_rule_of_78());
    }

    #[test]
    fn test_dispatch_to_interest_only() {
        let input: RepaymentDueInput = InterestOnlyInput {
            remaining_principal: dec!(1000),
            accrued_interest: dec!(5.555),
            accrued_interest_excluding_overpayment: dec!(5.555),
            precision: 2,
            is_last_repayment_date: true,
        }
        .into();
        let result = calculate_repayment_due(&input);
        assert_eq!(result.interest_due, dec!(5.56));
        assert_eq!(result.principal_due_excluding_overpayment, dec!(1000.00));
    }

    #[test]
    fn test_tagged_input_deserialises() {
        let json = r#"{
            "method": "flat_interest",
            "remaining_principal": "10000",
            "original_principal": "10000",
            "annual_interest_rate": "0.12",
            "precision": 2,
            "total_term": 12,
            "remaining_term": 12,
            "use_rule_of_78": false
        }"#;
        let input: RepaymentDueInput = serde_json::from_str(json).unwrap();
        assert_eq!(calculate_repayment_due(&input).emi, dec!(933.33));
    }
}
