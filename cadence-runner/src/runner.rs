//! The runner state machine.
//!
//! Drives parameter sets × iterations with the hook lifecycle:
//! class-level before hooks → subjects (before-methods → timed method →
//! after-methods, per iteration) → class-level after hooks, strictly
//! sequential per benchmark. The result tree preserves declaration,
//! parameter-product, and sequence order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cadence_core::{BenchmarkMetadata, ParameterSet, SubjectMetadata};
use chrono::Utc;
use thiserror::Error;

use crate::memory::{current_allocation, reset_allocation_counter};
use crate::progress::ProgressSink;
use crate::result::{BenchmarkResult, Iteration, SubjectResult, SuiteResult, VariantResult};
use crate::timer::Timer;

/// Error type surfaced by dispatcher implementations.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// A failure surfacing from a benchmarked method or hook.
///
/// Aborts the current subject's remaining iterations; already-recorded
/// iterations are retained. No retry is attempted at this layer.
#[derive(Debug, Clone, Error)]
#[error("execution of method \"{method}\" failed in benchmark class \"{class}\": {message}")]
pub struct ExecutionFailure {
    /// Benchmark class
    pub class: String,
    /// Method that failed
    pub method: String,
    /// Collaborator-provided detail
    pub message: String,
}

/// Context handed to hooks and benchmarked methods for one iteration.
#[derive(Debug)]
pub struct IterationContext<'a> {
    /// Zero-based iteration index within the variant
    pub index: u32,
    /// Parameter set of the current variant
    pub parameters: &'a ParameterSet,
}

/// An instantiated benchmark class, able to receive instance-scoped calls.
pub trait SubjectInstance {
    /// Call an instance method with the iteration context.
    fn call(&mut self, method: &str, ctx: &IterationContext<'_>) -> Result<(), DynError>;
}

/// Dispatch capability the runner executes through.
///
/// Class-level hooks are dispatched statically; subjects and their hooks run
/// on an instance created once per subject.
pub trait SubjectDispatcher {
    /// Create an instance of the benchmark class.
    fn instantiate(&self, class: &str) -> Result<Box<dyn SubjectInstance>, DynError>;

    /// Call a static (class-level) method.
    fn call_static(&self, class: &str, method: &str) -> Result<(), DynError>;
}

/// Compute the variant list for a subject: the Cartesian product across all
/// providers' parameter-set lists.
///
/// The product is taken across providers, not within one provider's list;
/// the first provider is the most significant position. No providers yields
/// a single empty variant, so every subject executes at least once per
/// iteration count.
pub fn parameter_variants(provider_sets: &[Vec<ParameterSet>]) -> Vec<ParameterSet> {
    let mut variants = vec![ParameterSet::new()];
    for sets in provider_sets {
        if sets.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(variants.len() * sets.len());
        for base in &variants {
            for set in sets {
                next.push(base.merged_with(set));
            }
        }
        variants = next;
    }
    variants
}

/// Executes built metadata and produces the result tree.
///
/// Single-threaded and sequential; the runner exclusively owns the result
/// tree it builds during a run.
pub struct Runner<D, P> {
    dispatcher: D,
    progress: P,
    abort: Arc<AtomicBool>,
    iteration_override: Option<u32>,
}

impl<D, P> Runner<D, P>
where
    D: SubjectDispatcher,
    P: ProgressSink,
{
    /// Create a runner over a dispatch capability and a progress sink.
    pub fn new(dispatcher: D, progress: P) -> Self {
        Self {
            dispatcher,
            progress,
            abort: Arc::new(AtomicBool::new(false)),
            iteration_override: None,
        }
    }

    /// Use an externally-owned abort flag. Checked between iterations; on
    /// abort, data up to the last completed iteration remains valid.
    pub fn with_abort_flag(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = abort;
        self
    }

    /// Override every subject's configured iteration count, as set by the
    /// `iterations` configuration key. `None` keeps the per-subject counts.
    pub fn with_iteration_override(mut self, iterations: Option<u32>) -> Self {
        self.iteration_override = iterations;
        self
    }

    /// Run every benchmark in the collection.
    pub fn run_all(&self, benchmarks: &[BenchmarkMetadata]) -> SuiteResult {
        self.run(benchmarks, None)
    }

    /// Run an already-filtered benchmark collection with an optional run
    /// context label. Results preserve the input declaration order.
    pub fn run(&self, benchmarks: &[BenchmarkMetadata], context: Option<String>) -> SuiteResult {
        let date = Utc::now();
        let mut benchmark_results = Vec::with_capacity(benchmarks.len());
        for benchmark in benchmarks {
            benchmark_results.push(self.run_benchmark(benchmark));
            if self.abort.load(Ordering::Relaxed) {
                break;
            }
        }
        SuiteResult {
            date,
            context,
            benchmark_results,
        }
    }

    fn run_benchmark(&self, benchmark: &BenchmarkMetadata) -> BenchmarkResult {
        self.progress.benchmark_start(benchmark);

        let mut result = BenchmarkResult {
            class: benchmark.class.clone(),
            path: benchmark.path.clone(),
            subjects: Vec::with_capacity(benchmark.subjects.len()),
            error: None,
        };

        // Class-level before hooks run once, prior to any subject. A hook
        // failure skips the benchmark's subjects entirely.
        for hook in &benchmark.before_class_methods {
            if let Err(err) = self.dispatcher.call_static(&benchmark.class, hook) {
                result.error = Some(self.failure(benchmark, hook, err).to_string());
                self.progress.benchmark_end(&result);
                return result;
            }
        }

        for subject in &benchmark.subjects {
            result.subjects.push(self.run_subject(benchmark, subject));
            if self.abort.load(Ordering::Relaxed) {
                break;
            }
        }

        // Class-level after hooks run once, after all subjects complete.
        for hook in &benchmark.after_class_methods {
            if let Err(err) = self.dispatcher.call_static(&benchmark.class, hook) {
                if result.error.is_none() {
                    result.error = Some(self.failure(benchmark, hook, err).to_string());
                }
                break;
            }
        }

        self.progress.benchmark_end(&result);
        result
    }

    fn run_subject(&self, benchmark: &BenchmarkMetadata, subject: &SubjectMetadata) -> SubjectResult {
        self.progress.subject_start(subject);

        let mut result = SubjectResult {
            method: subject.method.clone(),
            description: subject.description.clone(),
            groups: subject.groups.clone(),
            variants: Vec::new(),
            error: None,
        };

        let mut instance = match self.dispatcher.instantiate(&benchmark.class) {
            Ok(instance) => instance,
            Err(err) => {
                result.error = Some(self.failure(benchmark, &subject.method, err).to_string());
                self.progress.subject_end(&result);
                return result;
            }
        };

        let iterations = self.iteration_override.unwrap_or(subject.iterations);

        'variants: for parameter_set in parameter_variants(subject.parameter_sets()) {
            let mut variant = VariantResult {
                parameter_set: parameter_set.clone(),
                iterations: Vec::with_capacity(iterations as usize),
            };

            for index in 0..iterations {
                if self.abort.load(Ordering::Relaxed) {
                    result.variants.push(variant);
                    break 'variants;
                }

                match self.run_iteration(benchmark, subject, instance.as_mut(), &parameter_set, index)
                {
                    Ok(iteration) => variant.iterations.push(iteration),
                    Err(failure) => {
                        result.error = Some(failure.to_string());
                        result.variants.push(variant);
                        break 'variants;
                    }
                }
            }

            result.variants.push(variant);
        }

        self.progress.subject_end(&result);
        result
    }

    fn run_iteration(
        &self,
        benchmark: &BenchmarkMetadata,
        subject: &SubjectMetadata,
        instance: &mut dyn SubjectInstance,
        parameter_set: &ParameterSet,
        index: u32,
    ) -> Result<Iteration, ExecutionFailure> {
        let ctx = IterationContext {
            index,
            parameters: parameter_set,
        };

        self.progress.iteration_start(subject, index);

        for hook in &subject.before_methods {
            instance
                .call(hook, &ctx)
                .map_err(|err| self.failure(benchmark, hook, err))?;
        }

        reset_allocation_counter();
        let timer = Timer::start();
        instance
            .call(&subject.method, &ctx)
            .map_err(|err| self.failure(benchmark, &subject.method, err))?;
        let elapsed_micros = timer.stop();
        let (memory_delta, _alloc_count) = current_allocation();

        for hook in &subject.after_methods {
            instance
                .call(hook, &ctx)
                .map_err(|err| self.failure(benchmark, hook, err))?;
        }

        let iteration = Iteration {
            index,
            parameters: parameter_set.clone(),
            elapsed_micros,
            memory_delta,
        };
        self.progress.iteration_end(&iteration);
        Ok(iteration)
    }

    fn failure(&self, benchmark: &BenchmarkMetadata, method: &str, err: DynError) -> ExecutionFailure {
        ExecutionFailure {
            class: benchmark.class.clone(),
            method: method.to_string(),
            message: err.to_string(),
        }
    }
}
