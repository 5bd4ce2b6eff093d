//! Constraint evaluator.
//!
//! Reduces a constraint AST against a concrete measurement to a boolean.
//! Time metrics live in microseconds; time-valued operands are normalized to
//! the same base before comparison, and comparing a bare scalar against a
//! time metric (or vice versa) is a unit-mismatch error rather than a silent
//! coercion.

use cadence_core::ParamValue;
use fxhash::FxHashMap;
use thiserror::Error;

use crate::ast::{Comparison, Constraint, ConstraintVisitor, Value};

/// Errors from evaluating a constraint against a measurement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The constraint references a parameter the measurement does not have.
    #[error("Unknown parameter \"{0}\" in measurement")]
    UnknownParameter(String),

    /// A time metric was compared against a unit-less scalar.
    #[error("Unit mismatch comparing \"{param}\": time values must be compared against time values")]
    UnitMismatch {
        /// Offending parameter name
        param: String,
    },

    /// The operand types admit no ordering (e.g. `<` between strings and
    /// numbers).
    #[error("Cannot compare \"{param}\": incompatible operand types")]
    Incomparable {
        /// Offending parameter name
        param: String,
    },
}

/// One measured metric.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// A duration, stored in microseconds
    Time(f64),
    /// A plain scalar (memory delta, counts, labels)
    Scalar(ParamValue),
}

/// A concrete measurement: parameter name to metric.
#[derive(Debug, Clone, Default)]
pub struct Measurement {
    values: FxHashMap<String, Metric>,
}

impl Measurement {
    /// Create an empty measurement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a time metric, given in microseconds.
    pub fn set_time(&mut self, param: impl Into<String>, micros: f64) {
        self.values.insert(param.into(), Metric::Time(micros));
    }

    /// Record a scalar metric.
    pub fn set_scalar(&mut self, param: impl Into<String>, value: ParamValue) {
        self.values.insert(param.into(), Metric::Scalar(value));
    }

    /// Look up a metric by parameter name.
    pub fn get(&self, param: &str) -> Option<&Metric> {
        self.values.get(param)
    }
}

/// Evaluator visitor: boolean algebra over the AST against one measurement.
pub struct Evaluator<'a> {
    measurement: &'a Measurement,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over a measurement.
    pub fn new(measurement: &'a Measurement) -> Self {
        Self { measurement }
    }

    fn evaluate_comparison(&self, comparison: &Comparison) -> Result<bool, EvalError> {
        let metric = self
            .measurement
            .get(&comparison.param)
            .ok_or_else(|| EvalError::UnknownParameter(comparison.param.clone()))?;

        let ordering = match (metric, &comparison.value) {
            (Metric::Time(micros), Value::Time(tv)) => micros
                .partial_cmp(&tv.as_microseconds())
                .ok_or_else(|| EvalError::Incomparable {
                    param: comparison.param.clone(),
                })?,
            (Metric::Time(_), Value::Scalar(_)) | (Metric::Scalar(_), Value::Time(_)) => {
                return Err(EvalError::UnitMismatch {
                    param: comparison.param.clone(),
                });
            }
            (Metric::Scalar(left), Value::Scalar(right)) => {
                compare_scalars(left, right).ok_or_else(|| EvalError::Incomparable {
                    param: comparison.param.clone(),
                })?
            }
        };

        Ok(comparison.operator.matches(ordering))
    }
}

/// Ordering between two scalars, where one exists. Numbers compare
/// numerically, strings lexicographically, booleans as false < true.
fn compare_scalars(left: &ParamValue, right: &ParamValue) -> Option<std::cmp::Ordering> {
    match (left, right) {
        (ParamValue::Str(a), ParamValue::Str(b)) => Some(a.cmp(b)),
        (ParamValue::Bool(a), ParamValue::Bool(b)) => Some(a.cmp(b)),
        (ParamValue::Null, ParamValue::Null) => Some(std::cmp::Ordering::Equal),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

impl ConstraintVisitor for Evaluator<'_> {
    type Output = Result<bool, EvalError>;

    fn visit(&self, constraint: &Constraint) -> Self::Output {
        match constraint {
            Constraint::Comparison(comparison) => self.evaluate_comparison(comparison),
            Constraint::And(left, right) => Ok(self.visit(left)? && self.visit(right)?),
            Constraint::Or(left, right) => Ok(self.visit(left)? || self.visit(right)?),
            Constraint::Not(inner) => Ok(!self.visit(inner)?),
        }
    }
}
