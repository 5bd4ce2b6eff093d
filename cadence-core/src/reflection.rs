//! Reflection interfaces.
//!
//! The parsing side (source file → class descriptor) and the invocation side
//! (call a method, probe staticness) are collaborator concerns. The core
//! depends only on these narrow traits, so any concrete mechanism - static
//! analysis, dynamic loading, an in-memory registry in tests - satisfies
//! them.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A reflected benchmark class description, prior to validation.
///
/// Carries the declared hook/provider/group names exactly as found on the
/// class; the metadata factory is responsible for checking that the
/// declarations resolve.
#[derive(Debug, Clone)]
pub struct ReflectedClass {
    /// Source path the class was reflected from
    pub path: PathBuf,
    /// Fully-qualified class name
    pub class: String,
    /// Abstract classes are not benchmarkable
    pub is_abstract: bool,
    /// Suite-wide before hooks, callable without an instance
    pub before_class_methods: Vec<String>,
    /// Suite-wide after hooks, callable without an instance
    pub after_class_methods: Vec<String>,
    /// Declared benchmark subjects, in declaration order
    pub subjects: Vec<ReflectedSubject>,
}

/// One declared benchmarked operation on a reflected class.
#[derive(Debug, Clone)]
pub struct ReflectedSubject {
    /// Method name of the benchmarked operation
    pub method: String,
    /// Human description
    pub description: String,
    /// Configured iteration count
    pub iterations: u32,
    /// Parameter provider method names, in declaration order
    pub param_providers: Vec<String>,
    /// Instance-scoped before hooks
    pub before_methods: Vec<String>,
    /// Instance-scoped after hooks
    pub after_methods: Vec<String>,
    /// Group tags for selection and historical filtering
    pub groups: Vec<String>,
}

impl ReflectedSubject {
    /// Minimal subject with the given method name; used heavily in tests.
    pub fn named(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            description: String::new(),
            iterations: 1,
            param_providers: Vec::new(),
            before_methods: Vec::new(),
            after_methods: Vec::new(),
            groups: Vec::new(),
        }
    }
}

/// Reflection provider: parses a source input into a class descriptor.
///
/// Yielding `None` means "no benchmark here" and is a non-fatal outcome,
/// distinct from validation failure.
pub trait ClassReflector {
    /// Reflect the class declared at `path`, if any.
    fn reflect(&self, path: &Path) -> Option<ReflectedClass>;
}

/// Error surfaced by the invocation capability.
///
/// The core treats any non-success outcome as equivalent to "method does not
/// exist"; the message is carried for diagnostics only.
#[derive(Debug, Clone, Error)]
#[error("invocation of {class}::{method} failed: {message}")]
pub struct InvokeError {
    /// Class the invocation targeted
    pub class: String,
    /// Method the invocation targeted
    pub method: String,
    /// Collaborator-provided detail
    pub message: String,
}

impl InvokeError {
    /// Build an invocation error for the given target.
    pub fn new(
        class: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            message: message.into(),
        }
    }
}

/// Reflection-invocation capability.
///
/// Used by the metadata factory to validate hooks and to execute parameter
/// provider methods for their raw return value.
pub trait MethodInvoker {
    /// Whether the method exists on the class.
    fn exists(&self, class: &str, method: &str) -> bool;

    /// Whether the method is callable without an instance.
    fn is_static(&self, class: &str, method: &str) -> bool;

    /// Invoke the method and return its raw value.
    fn invoke(&self, class: &str, method: &str) -> Result<serde_json::Value, InvokeError>;
}
