//! Day-count basis for converting day counts into year fractions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a day-count label is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown day count basis: {0}. Must be one of: 365, ACT/365")]
pub struct DayCountParseError(pub String);

/// Day-count basis accepted by the calculation API.
///
/// Two labels are accepted for forward compatibility, but both currently use
/// a fixed 365-day denominator; the label does not change the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountBasis {
    /// Fixed 365-day year.
    #[default]
    #[serde(rename = "365")]
    Fixed365,

    /// Actual/365. Same denominator as [`DayCountBasis::Fixed365`].
    #[serde(rename = "ACT/365")]
    Act365,
}

impl DayCountBasis {
    /// Returns the label used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountBasis::Fixed365 => "365",
            DayCountBasis::Act365 => "ACT/365",
        }
    }

    /// Converts a whole-day count into a fraction of a year.
    pub fn year_fraction(&self, days: i64) -> f64 {
        match self {
            DayCountBasis::Fixed365 | DayCountBasis::Act365 => days as f64 / 365.0,
        }
    }
}

impl FromStr for DayCountBasis {
    type Err = DayCountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "365" => Ok(DayCountBasis::Fixed365),
            "ACT/365" => Ok(DayCountBasis::Act365),
            other => Err(DayCountParseError(other.to_string())),
        }
    }
}

impl fmt::Display for DayCountBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
