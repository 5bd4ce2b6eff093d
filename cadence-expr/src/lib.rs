#![warn(missing_docs)]
//! Cadence Expression Engine
//!
//! A small typed expression language used for two things that must always
//! agree:
//! - asserting pass/fail conditions against a concrete measurement (the
//!   `Evaluator` visitor)
//! - filtering historical results in the storage layer (the `SqlTranslator`
//!   visitor, which lowers the same AST into a predicate fragment plus bound
//!   values)
//!
//! The AST is a closed sum type; each visitor matches exhaustively, so
//! adding a node variant is a compile-time event for every visitor.

mod ast;
mod evaluator;
mod sql;

pub use ast::{Comparator, Comparison, Constraint, ConstraintVisitor, TimeValue, Value};
pub use evaluator::{EvalError, Evaluator, Measurement, Metric};
pub use sql::SqlTranslator;
