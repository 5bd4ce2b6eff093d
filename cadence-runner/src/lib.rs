#![warn(missing_docs)]
//! Cadence Runner - Execution Orchestration
//!
//! Consumes validated benchmark metadata and drives execution:
//! - parameter cross-product (one variant per parameter-set combination)
//! - hook lifecycle (class-level static hooks, instance-scoped subject hooks)
//! - repeated iterations with microsecond timing and allocation deltas
//! - a strict containment result tree built bottom-up in execution order
//!
//! Execution is single-threaded and strictly sequential: measurement
//! integrity requires exclusive use of timing and allocation counters for
//! the duration of an iteration.

mod config;
mod memory;
mod progress;
mod result;
mod runner;
mod timer;

pub use config::RunnerConfig;
pub use memory::{current_allocation, reset_allocation_counter, TrackingAllocator};
pub use progress::{NullSink, ProgressBarSink, ProgressSink};
pub use result::{BenchmarkResult, Iteration, SubjectResult, SuiteResult, VariantResult};
pub use runner::{
    parameter_variants, DynError, ExecutionFailure, IterationContext, Runner, SubjectDispatcher,
    SubjectInstance,
};
pub use timer::Timer;
