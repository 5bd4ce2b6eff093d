//! Result model.
//!
//! A strict containment hierarchy built bottom-up as execution proceeds:
//! suite ⊇ benchmarks ⊇ subjects ⊇ variants ⊇ iterations. Read-only once
//! the runner returns; ordering mirrors declaration order for benchmarks
//! and subjects, parameter-product order for variants, and sequence order
//! for iterations, because baseline comparisons key off positional and
//! parameter-set identity.

use cadence_core::{ParameterSet, TimeUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timed execution of a subject under one parameter set.
///
/// Created by the runner, never mutated after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Iteration {
    /// Zero-based position within the variant
    pub index: u32,
    /// Parameter set the iteration ran under
    pub parameters: ParameterSet,
    /// Elapsed wall time in microseconds
    pub elapsed_micros: f64,
    /// Net bytes allocated during the iteration
    pub memory_delta: i64,
}

impl Iteration {
    /// Elapsed time converted into the given unit.
    pub fn elapsed_in(&self, unit: TimeUnit) -> f64 {
        unit.from_microseconds(self.elapsed_micros)
    }
}

/// Results for one parameter-set combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantResult {
    /// The combined parameter set for this variant
    pub parameter_set: ParameterSet,
    /// Iterations in execution order
    pub iterations: Vec<Iteration>,
}

impl VariantResult {
    /// Mean elapsed time across iterations, in microseconds.
    pub fn mean_micros(&self) -> Option<f64> {
        if self.iterations.is_empty() {
            return None;
        }
        let sum: f64 = self.iterations.iter().map(|i| i.elapsed_micros).sum();
        Some(sum / self.iterations.len() as f64)
    }
}

/// Results for one benchmarked operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResult {
    /// Subject method name
    pub method: String,
    /// Human description
    pub description: String,
    /// Group tags carried over from metadata
    pub groups: Vec<String>,
    /// Variants in parameter-product order
    pub variants: Vec<VariantResult>,
    /// Failure that aborted the subject, if any. Completed iterations are
    /// retained alongside.
    pub error: Option<String>,
}

impl SubjectResult {
    /// Total iterations recorded across all variants.
    pub fn iteration_count(&self) -> usize {
        self.variants.iter().map(|v| v.iterations.len()).sum()
    }
}

/// Results for one benchmark class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark class name
    pub class: String,
    /// Source path
    pub path: std::path::PathBuf,
    /// Subjects in declaration order
    pub subjects: Vec<SubjectResult>,
    /// Failure of a class-level hook, if any; subjects are skipped when set.
    pub error: Option<String>,
}

/// The complete result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    /// When the run started
    pub date: DateTime<Utc>,
    /// Optional user-supplied context label for the run
    pub context: Option<String>,
    /// Benchmark results in input declaration order
    pub benchmark_results: Vec<BenchmarkResult>,
}

impl SuiteResult {
    /// Benchmark results in declaration order.
    pub fn benchmark_results(&self) -> &[BenchmarkResult] {
        &self.benchmark_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_conversion() {
        let iteration = Iteration {
            index: 0,
            parameters: ParameterSet::new(),
            elapsed_micros: 1_500.0,
            memory_delta: 0,
        };
        assert_eq!(iteration.elapsed_in(TimeUnit::Milliseconds), 1.5);
        assert_eq!(iteration.elapsed_in(TimeUnit::Microseconds), 1_500.0);
    }

    #[test]
    fn test_variant_mean() {
        let variant = VariantResult {
            parameter_set: ParameterSet::new(),
            iterations: vec![
                Iteration {
                    index: 0,
                    parameters: ParameterSet::new(),
                    elapsed_micros: 100.0,
                    memory_delta: 0,
                },
                Iteration {
                    index: 1,
                    parameters: ParameterSet::new(),
                    elapsed_micros: 300.0,
                    memory_delta: 0,
                },
            ],
        };
        assert_eq!(variant.mean_micros(), Some(200.0));
    }
}
