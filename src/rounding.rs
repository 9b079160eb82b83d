//! Decimal rounding to a fixed number of places.
//!
//! Every amount the engine hands back is rounded through here. Half-up is the
//! default; the other modes exist for products whose ledgers use a different
//! convention.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::AmortisationError;

/// Rounding mode applied when discarding digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum RoundingMode {
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest, ties away from zero.
    #[default]
    HalfUp,
    /// Nearest, ties towards zero.
    HalfDown,
    /// Nearest, ties to the even neighbour.
    HalfEven,
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards zero, unless the last kept digit would be 0 or 5, then away from zero.
    #[serde(rename = "05UP")]
    ZeroFiveUp,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::ZeroFiveUp => "05UP",
        }
    }

    fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Down | RoundingMode::ZeroFiveUp => RoundingStrategy::ToZero,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = AmortisationError;

    /// Accepts `HALF_UP` as well as the `ROUND_HALF_UP` spelling, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROUND_").unwrap_or(&upper);
        match name {
            "CEILING" => Ok(RoundingMode::Ceiling),
            "FLOOR" => Ok(RoundingMode::Floor),
            "HALF_UP" => Ok(RoundingMode::HalfUp),
            "HALF_DOWN" => Ok(RoundingMode::HalfDown),
            "HALF_EVEN" => Ok(RoundingMode::HalfEven),
            "UP" => Ok(RoundingMode::Up),
            "DOWN" => Ok(RoundingMode::Down),
            "05UP" => Ok(RoundingMode::ZeroFiveUp),
            _ => Err(AmortisationError::unknown("rounding_mode", s)),
        }
    }
}

impl TryFrom<String> for RoundingMode {
    type Error = AmortisationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Number of places and the mode to round with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingSpec {
    pub places: u32,
    #[serde(default)]
    pub mode: RoundingMode,
}

impl RoundingSpec {
    pub fn new(places: u32, mode: RoundingMode) -> Self {
        RoundingSpec { places, mode }
    }

    pub fn half_up(places: u32) -> Self {
        RoundingSpec::new(places, RoundingMode::HalfUp)
    }

    pub fn round(&self, amount: Decimal) -> Decimal {
        round_decimal(amount, self.places, self.mode)
    }
}

/// Rounds `amount` to exactly `places` fractional digits.
pub fn round_decimal(amount: Decimal, places: u32, mode: RoundingMode) -> Decimal {
    let mut rounded = match mode {
        RoundingMode::ZeroFiveUp => round_zero_five_up(amount, places),
        _ => amount.round_dp_with_strategy(places, mode.strategy()),
    };
    rounded.rescale(places);
    rounded
}

/// Shorthand for the default mode.
pub fn round_half_up(amount: Decimal, places: u32) -> Decimal {
    round_decimal(amount, places, RoundingMode::HalfUp)
}

fn round_zero_five_up(amount: Decimal, places: u32) -> Decimal {
    let mut truncated = amount.round_dp_with_strategy(places, RoundingStrategy::ToZero);
    if truncated == amount {
        return truncated;
    }
    truncated.rescale(places);
    let last_digit = (truncated.mantissa() % 10).abs();
    if last_digit == 0 || last_digit == 5 {
        amount.round_dp_with_strategy(places, RoundingStrategy::AwayFromZero)
    } else {
        truncated
    }
}
