#![warn(missing_docs)]
//! Cadence Core - Benchmark Metadata
//!
//! This crate turns a reflected class description into a validated execution
//! plan:
//! - `ReflectedClass`/`ReflectedSubject` descriptors produced by a
//!   reflection provider
//! - `MetadataFactory` which validates hooks and resolves parameter
//!   providers into concrete parameter sets
//! - the `BenchmarkMetadata`/`SubjectMetadata` model consumed by the runner
//! - scalar parameter values and the closed `TimeUnit` enumeration

mod error;
mod factory;
mod metadata;
mod params;
mod reflection;
mod units;

pub use error::MetadataError;
pub use factory::MetadataFactory;
pub use metadata::{BenchmarkMetadata, SubjectMetadata};
pub use params::{json_type_name, ParamValue, ParameterSet};
pub use reflection::{ClassReflector, InvokeError, MethodInvoker, ReflectedClass, ReflectedSubject};
pub use units::{InvalidTimeUnit, TimeUnit};
