//! Validated benchmark metadata.
//!
//! Built once per reflected class by the `MetadataFactory` and read-only
//! thereafter; safe to reuse across repeated runs without rebuilding.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;

/// A validated benchmark unit: one class with its subjects and class-level
/// hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetadata {
    /// Source path of the benchmark class
    pub path: PathBuf,
    /// Class name
    pub class: String,
    /// Suite-wide before hooks (static), validated
    pub before_class_methods: Vec<String>,
    /// Suite-wide after hooks (static), validated
    pub after_class_methods: Vec<String>,
    /// Subjects in declaration order
    pub subjects: Vec<SubjectMetadata>,
}

impl BenchmarkMetadata {
    /// Subjects in declaration order.
    pub fn subjects(&self) -> &[SubjectMetadata] {
        &self.subjects
    }
}

/// One validated benchmarked operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectMetadata {
    /// Method name
    pub method: String,
    /// Human description
    pub description: String,
    /// Iteration count per variant
    pub iterations: u32,
    /// Parameter provider names, declaration order
    pub param_providers: Vec<String>,
    /// Instance-scoped before hooks
    pub before_methods: Vec<String>,
    /// Instance-scoped after hooks
    pub after_methods: Vec<String>,
    /// Group tags
    pub groups: Vec<String>,
    /// Resolved parameter sets, one list per provider in declaration order.
    /// Populated exactly once by the factory's provider pass.
    parameter_sets: Vec<Vec<ParameterSet>>,
}

impl SubjectMetadata {
    /// Create subject metadata with unresolved parameter sets.
    pub fn new(
        method: String,
        description: String,
        iterations: u32,
        param_providers: Vec<String>,
        before_methods: Vec<String>,
        after_methods: Vec<String>,
        groups: Vec<String>,
    ) -> Self {
        Self {
            method,
            description,
            iterations,
            param_providers,
            before_methods,
            after_methods,
            groups,
            parameter_sets: Vec::new(),
        }
    }

    /// Attach the resolved parameter-set sequence.
    ///
    /// Called once by the factory after provider invocation; the model is
    /// read-only from then on.
    pub fn set_parameter_sets(&mut self, parameter_sets: Vec<Vec<ParameterSet>>) {
        self.parameter_sets = parameter_sets;
    }

    /// Resolved parameter sets, one list per provider.
    pub fn parameter_sets(&self) -> &[Vec<ParameterSet>] {
        &self.parameter_sets
    }
}
