#![warn(missing_docs)]
//! # Cadence
//!
//! Micro-benchmark orchestration and analysis engine.
//!
//! Cadence takes reflected benchmark class descriptions through a full
//! measurement pipeline:
//! - **Metadata**: `MetadataFactory` validates hook declarations and resolves
//!   parameter providers into concrete scalar parameter sets
//! - **Execution**: `Runner` drives the parameter cross-product with the
//!   class/subject hook lifecycle, microsecond timing and allocation deltas
//! - **Constraints**: a typed constraint AST evaluated against live
//!   measurements or lowered to a storage predicate, always in agreement
//! - **History**: `Repository` persists suite results and queries prior runs
//!   through a pluggable relational connection
//!
//! ## Quick Start
//!
//! ```ignore
//! use cadence::prelude::*;
//!
//! let factory = MetadataFactory::new(reflector, invoker);
//! let metadata = factory.metadata_for_file(path)?.ok_or("not a benchmark")?;
//!
//! let runner = Runner::new(dispatcher, NullSink);
//! let suite = runner.run_all(&[metadata]);
//! ```
//!
//! ## Constraints
//!
//! ```ignore
//! let limit = Constraint::compare(
//!     "time",
//!     Comparator::Lt,
//!     Value::Time(TimeValue::new(2.0, "milliseconds")?),
//! );
//! assert!(Evaluator::new(&measurement).visit(&limit)?);
//! ```

// Re-export metadata types
pub use cadence_core::{
    json_type_name, BenchmarkMetadata, ClassReflector, InvalidTimeUnit, InvokeError,
    MetadataError, MetadataFactory, MethodInvoker, ParamValue, ParameterSet, ReflectedClass,
    ReflectedSubject, SubjectMetadata, TimeUnit,
};

// Re-export the constraint engine
pub use cadence_expr::{
    Comparator, Comparison, Constraint, ConstraintVisitor, EvalError, Evaluator, Measurement,
    Metric, SqlTranslator, TimeValue, Value,
};

// Re-export execution
pub use cadence_runner::{
    current_allocation, parameter_variants, reset_allocation_counter, BenchmarkResult, DynError,
    ExecutionFailure, Iteration, IterationContext, NullSink, ProgressBarSink, ProgressSink,
    Runner, RunnerConfig, SubjectDispatcher, SubjectInstance, SubjectResult, SuiteResult, Timer,
    TrackingAllocator, VariantResult,
};

// Re-export history
pub use cadence_storage::{
    Connection, ConnectionManager, HistoryEntry, Repository, Row, StorageError,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Comparator, Constraint, ConstraintVisitor, Evaluator, Measurement, MetadataFactory,
        NullSink, ParamValue, ParameterSet, Repository, Runner, TimeUnit, TimeValue, Value,
    };
}
