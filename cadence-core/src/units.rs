//! Time units.
//!
//! A closed enumeration of unit identifiers, each with a fixed multiplier to
//! the microsecond base. All cross-unit comparisons in the expression layer
//! normalize through this base.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a unit identifier is outside the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time unit \"{0}\", expected one of: microseconds, milliseconds, seconds, minutes, hours, days")]
pub struct InvalidTimeUnit(pub String);

/// Closed set of time units with a microsecond base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Base unit
    Microseconds,
    /// 1e3 microseconds
    Milliseconds,
    /// 1e6 microseconds
    Seconds,
    /// 6e7 microseconds
    Minutes,
    /// 3.6e9 microseconds
    Hours,
    /// 8.64e10 microseconds
    Days,
}

impl TimeUnit {
    /// Parse a unit identifier. Singular, plural and short forms are all
    /// accepted; anything else is an error.
    pub fn from_identifier(identifier: &str) -> Result<Self, InvalidTimeUnit> {
        match identifier {
            "microsecond" | "microseconds" | "us" | "µs" => Ok(TimeUnit::Microseconds),
            "millisecond" | "milliseconds" | "ms" => Ok(TimeUnit::Milliseconds),
            "second" | "seconds" | "s" => Ok(TimeUnit::Seconds),
            "minute" | "minutes" | "m" => Ok(TimeUnit::Minutes),
            "hour" | "hours" | "h" => Ok(TimeUnit::Hours),
            "day" | "days" | "d" => Ok(TimeUnit::Days),
            other => Err(InvalidTimeUnit(other.to_string())),
        }
    }

    /// Multiplier from this unit to microseconds.
    pub fn multiplier(&self) -> f64 {
        match self {
            TimeUnit::Microseconds => 1.0,
            TimeUnit::Milliseconds => 1_000.0,
            TimeUnit::Seconds => 1_000_000.0,
            TimeUnit::Minutes => 60_000_000.0,
            TimeUnit::Hours => 3_600_000_000.0,
            TimeUnit::Days => 86_400_000_000.0,
        }
    }

    /// Convert a value expressed in this unit to microseconds.
    pub fn to_microseconds(&self, value: f64) -> f64 {
        value * self.multiplier()
    }

    /// Convert a microsecond value into this unit.
    pub fn from_microseconds(&self, micros: f64) -> f64 {
        micros / self.multiplier()
    }

    /// Display suffix for reports.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Microseconds => "μs",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert_eq!(
            TimeUnit::from_identifier("millisecond").unwrap(),
            TimeUnit::Milliseconds
        );
        assert_eq!(TimeUnit::from_identifier("us").unwrap(), TimeUnit::Microseconds);
        assert_eq!(TimeUnit::from_identifier("seconds").unwrap(), TimeUnit::Seconds);
    }

    #[test]
    fn test_unknown_identifier() {
        let err = TimeUnit::from_identifier("fortnight").unwrap_err();
        assert_eq!(err, InvalidTimeUnit("fortnight".to_string()));
        assert!(err.to_string().contains("Invalid time unit \"fortnight\""));
    }

    #[test]
    fn test_conversion_round_trip() {
        let micros = TimeUnit::Milliseconds.to_microseconds(1.5);
        assert_eq!(micros, 1_500.0);
        assert_eq!(TimeUnit::Milliseconds.from_microseconds(micros), 1.5);
        assert_eq!(TimeUnit::Minutes.to_microseconds(2.0), 120_000_000.0);
    }
}
