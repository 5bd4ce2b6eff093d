//! Constraint AST node types.

use cadence_core::{InvalidTimeUnit, ParamValue, TimeUnit};
use serde::{Deserialize, Serialize};

/// A time quantity with an explicit unit from the closed enumeration.
///
/// Comparisons always normalize through the microsecond base, so
/// `TimeValue::new(1.0, "millisecond")` and `TimeValue::from_microseconds(1000.0)`
/// are equivalent operands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    value: f64,
    unit: TimeUnit,
}

impl TimeValue {
    /// Construct from a value and a unit identifier.
    ///
    /// Fails with `InvalidTimeUnit` when the identifier is outside the
    /// closed enumeration.
    pub fn new(value: f64, unit: &str) -> Result<Self, InvalidTimeUnit> {
        Ok(Self {
            value,
            unit: TimeUnit::from_identifier(unit)?,
        })
    }

    /// Construct from an already-parsed unit.
    pub fn with_unit(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Construct a microsecond-based value.
    pub fn from_microseconds(value: f64) -> Self {
        Self {
            value,
            unit: TimeUnit::Microseconds,
        }
    }

    /// The raw value in its declared unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The declared unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The value normalized to the microsecond base.
    pub fn as_microseconds(&self) -> f64 {
        self.unit.to_microseconds(self.value)
    }
}

/// A leaf value in a constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Plain scalar (number, string, bool, null)
    Scalar(ParamValue),
    /// Time quantity with explicit unit
    Time(TimeValue),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl Comparator {
    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Neq => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }

    /// Apply the comparator to an ordering of `left` against `right`.
    pub fn matches(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Comparator::Eq => ordering == Equal,
            Comparator::Neq => ordering != Equal,
            Comparator::Lt => ordering == Less,
            Comparator::Lte => ordering != Greater,
            Comparator::Gt => ordering == Greater,
            Comparator::Gte => ordering != Less,
        }
    }
}

/// A single comparison of a measured parameter against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Name of the measured parameter / column
    pub param: String,
    /// Comparison operator
    pub operator: Comparator,
    /// Right-hand value
    pub value: Value,
}

/// A boolean constraint over measured values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Leaf comparison
    Comparison(Comparison),
    /// Both sides must hold
    And(Box<Constraint>, Box<Constraint>),
    /// Either side must hold
    Or(Box<Constraint>, Box<Constraint>),
    /// Negation
    Not(Box<Constraint>),
}

impl Constraint {
    /// Convenience constructor for a leaf comparison.
    pub fn compare(param: impl Into<String>, operator: Comparator, value: Value) -> Self {
        Constraint::Comparison(Comparison {
            param: param.into(),
            operator,
            value,
        })
    }

    /// `self AND other`
    pub fn and(self, other: Constraint) -> Self {
        Constraint::And(Box::new(self), Box::new(other))
    }

    /// `self OR other`
    pub fn or(self, other: Constraint) -> Self {
        Constraint::Or(Box::new(self), Box::new(other))
    }

    /// `NOT self`
    pub fn negate(self) -> Self {
        Constraint::Not(Box::new(self))
    }
}

/// Structural dispatch over constraint nodes.
///
/// Each node variant is handled by exactly one visit rule; composite nodes
/// recurse into children and combine according to the node's semantics.
pub trait ConstraintVisitor {
    /// Visitor-specific output: a boolean for the evaluator, a predicate
    /// fragment plus bound values for the query translator.
    type Output;

    /// Visit one node.
    fn visit(&self, constraint: &Constraint) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_value_normalization() {
        let ms = TimeValue::new(1.0, "millisecond").unwrap();
        let us = TimeValue::new(1000.0, "microsecond").unwrap();
        assert_eq!(ms.as_microseconds(), us.as_microseconds());
    }

    #[test]
    fn test_time_value_rejects_unknown_unit() {
        let err = TimeValue::new(1.0, "parsec").unwrap_err();
        assert_eq!(err, InvalidTimeUnit("parsec".to_string()));
    }

    #[test]
    fn test_comparator_matches() {
        use std::cmp::Ordering::*;
        assert!(Comparator::Lte.matches(Equal));
        assert!(Comparator::Lte.matches(Less));
        assert!(!Comparator::Lte.matches(Greater));
        assert!(Comparator::Neq.matches(Greater));
    }
}
