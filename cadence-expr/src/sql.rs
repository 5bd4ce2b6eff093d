//! Query translator.
//!
//! Lowers a constraint AST into a backend-agnostic predicate fragment plus
//! an ordered list of bound values, one `?` placeholder per leaf value in
//! left-to-right order. The translator is purely syntactic - it executes
//! nothing - and binds time values pre-normalized to microseconds so that
//! filtering by a constraint always agrees with evaluating it.

use cadence_core::ParamValue;

use crate::ast::{Comparison, Constraint, ConstraintVisitor, Value};

/// Translator visitor producing `(predicate, bound_values)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlTranslator;

impl SqlTranslator {
    /// Create a translator.
    pub fn new() -> Self {
        Self
    }

    fn translate_comparison(&self, comparison: &Comparison) -> (String, Vec<ParamValue>) {
        let bound = match &comparison.value {
            Value::Scalar(scalar) => scalar.clone(),
            // Stored rows keep times in the microsecond base.
            Value::Time(tv) => ParamValue::Float(tv.as_microseconds()),
        };
        (
            format!("{} {} ?", comparison.param, comparison.operator.as_sql()),
            vec![bound],
        )
    }
}

impl ConstraintVisitor for SqlTranslator {
    type Output = (String, Vec<ParamValue>);

    fn visit(&self, constraint: &Constraint) -> Self::Output {
        match constraint {
            Constraint::Comparison(comparison) => self.translate_comparison(comparison),
            Constraint::And(left, right) => {
                let (lsql, mut lvals) = self.visit(left);
                let (rsql, rvals) = self.visit(right);
                lvals.extend(rvals);
                (format!("({} AND {})", lsql, rsql), lvals)
            }
            Constraint::Or(left, right) => {
                let (lsql, mut lvals) = self.visit(left);
                let (rsql, rvals) = self.visit(right);
                lvals.extend(rvals);
                (format!("({} OR {})", lsql, rsql), lvals)
            }
            Constraint::Not(inner) => {
                let (sql, values) = self.visit(inner);
                (format!("NOT ({})", sql), values)
            }
        }
    }
}
