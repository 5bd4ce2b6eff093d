//! Metadata validation errors.
//!
//! Every variant carries enough identity (class, method) to locate the
//! offending declaration without re-running. The message wording is exact:
//! downstream comparison tooling matches on these strings, including the
//! `::` vs `:` separator difference between the two shape-violation
//! messages.

use thiserror::Error;

/// Fatal conditions while building metadata for one class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A declared class-level hook does not resolve to a method.
    #[error("Unknown {position} class method \"{method}\" in benchmark class \"{class}\"")]
    UnknownClassHook {
        /// `before` or `after`
        position: &'static str,
        /// Hook method name
        method: String,
        /// Benchmark class name
        class: String,
    },

    /// A class-level hook resolved to an instance method.
    #[error("{position} class method \"{method}\" must be static in benchmark class \"{class}\"")]
    ClassHookNotStatic {
        /// `before` or `after`
        position: &'static str,
        /// Hook method name
        method: String,
        /// Benchmark class name
        class: String,
    },

    /// A declared subject-level hook does not resolve to a method.
    #[error("Unknown {position} method \"{method}\" in benchmark class \"{class}\"")]
    UnknownSubjectHook {
        /// `before` or `after`
        position: &'static str,
        /// Hook method name
        method: String,
        /// Benchmark class name
        class: String,
    },

    /// A subject-level hook resolved to a static method; subject hooks must
    /// run on an instance.
    #[error("{position} method \"{method}\" must not be static in benchmark class \"{class}\"")]
    SubjectHookIsStatic {
        /// `before` or `after`
        position: &'static str,
        /// Hook method name
        method: String,
        /// Benchmark class name
        class: String,
    },

    /// A parameter provider returned something other than a sequence.
    #[error("Each parameter set must be an array, got \"{got}\" for {class}::{method}")]
    ProviderReturnNotSequence {
        /// Concrete type of the returned value
        got: &'static str,
        /// Benchmark class name
        class: String,
        /// Subject method name
        method: String,
    },

    /// An element of the provider return was not itself a sequence.
    #[error("Each parameter group must be an array, got \"{got}\" for {class}::{method}")]
    ParameterSetNotSequence {
        /// Concrete type of the offending element
        got: &'static str,
        /// Benchmark class name
        class: String,
        /// Subject method name
        method: String,
    },

    /// A parameter value was not a scalar. Note the single-colon separator;
    /// it differs from the other shape messages on purpose.
    #[error("Only scalar values allowed as parameter values, got \"{got}\" in {class}:{method}")]
    NonScalarParameterValue {
        /// Concrete type of the offending value
        got: &'static str,
        /// Benchmark class name
        class: String,
        /// Subject method name
        method: String,
    },
}
