//! Metadata factory.
//!
//! Two-phase build: structural metadata construction first, then a single
//! provider-invocation pass that attaches resolved parameter sets. The
//! validation order is deterministic: class-level hooks before any subject,
//! before-methods before after-methods within a subject, providers in
//! declaration order.

use std::path::Path;

use crate::error::MetadataError;
use crate::metadata::{BenchmarkMetadata, SubjectMetadata};
use crate::params::{json_type_name, ParamValue, ParameterSet};
use crate::reflection::{ClassReflector, MethodInvoker, ReflectedClass};

/// Builds validated `BenchmarkMetadata` from reflected class descriptions.
pub struct MetadataFactory<R, I> {
    reflector: R,
    invoker: I,
}

impl<R, I> MetadataFactory<R, I>
where
    R: ClassReflector,
    I: MethodInvoker,
{
    /// Create a factory over a reflection provider and an invocation
    /// capability.
    pub fn new(reflector: R, invoker: I) -> Self {
        Self { reflector, invoker }
    }

    /// Build metadata for the class declared in the given file.
    ///
    /// `Ok(None)` means "no benchmark here" - either the reflector yielded
    /// no class or the class is abstract. Both are non-fatal and distinct
    /// from validation failure.
    pub fn metadata_for_file(
        &self,
        path: &Path,
    ) -> Result<Option<BenchmarkMetadata>, MetadataError> {
        let class = match self.reflector.reflect(path) {
            Some(class) => class,
            None => return Ok(None),
        };
        self.build(&class)
    }

    /// Build metadata directly from a reflected class description.
    pub fn build(&self, class: &ReflectedClass) -> Result<Option<BenchmarkMetadata>, MetadataError> {
        if class.is_abstract {
            return Ok(None);
        }

        self.validate_class_hooks(class, "before", &class.before_class_methods)?;
        self.validate_class_hooks(class, "after", &class.after_class_methods)?;

        let mut subjects = Vec::with_capacity(class.subjects.len());
        for declared in &class.subjects {
            self.validate_subject_hooks(class, "before", &declared.before_methods)?;
            self.validate_subject_hooks(class, "after", &declared.after_methods)?;

            let mut subject = SubjectMetadata::new(
                declared.method.clone(),
                declared.description.clone(),
                declared.iterations,
                declared.param_providers.clone(),
                declared.before_methods.clone(),
                declared.after_methods.clone(),
                declared.groups.clone(),
            );

            let parameter_sets = self.resolve_parameter_sets(class, declared.method.as_str(), &declared.param_providers)?;
            subject.set_parameter_sets(parameter_sets);
            subjects.push(subject);
        }

        Ok(Some(BenchmarkMetadata {
            path: class.path.clone(),
            class: class.class.clone(),
            before_class_methods: class.before_class_methods.clone(),
            after_class_methods: class.after_class_methods.clone(),
            subjects,
        }))
    }

    /// Class-level hooks must exist and be callable without an instance.
    fn validate_class_hooks(
        &self,
        class: &ReflectedClass,
        position: &'static str,
        methods: &[String],
    ) -> Result<(), MetadataError> {
        for method in methods {
            if !self.invoker.exists(&class.class, method) {
                return Err(MetadataError::UnknownClassHook {
                    position,
                    method: method.clone(),
                    class: class.class.clone(),
                });
            }
            if !self.invoker.is_static(&class.class, method) {
                return Err(MetadataError::ClassHookNotStatic {
                    position,
                    method: method.clone(),
                    class: class.class.clone(),
                });
            }
        }
        Ok(())
    }

    /// Subject-level hooks must exist and must run on an instance.
    fn validate_subject_hooks(
        &self,
        class: &ReflectedClass,
        position: &'static str,
        methods: &[String],
    ) -> Result<(), MetadataError> {
        for method in methods {
            if !self.invoker.exists(&class.class, method) {
                return Err(MetadataError::UnknownSubjectHook {
                    position,
                    method: method.clone(),
                    class: class.class.clone(),
                });
            }
            if self.invoker.is_static(&class.class, method) {
                return Err(MetadataError::SubjectHookIsStatic {
                    position,
                    method: method.clone(),
                    class: class.class.clone(),
                });
            }
        }
        Ok(())
    }

    /// Invoke each provider and lower its raw return into parameter sets.
    ///
    /// The raw value must be a sequence of sequences of scalars. The three
    /// violation messages carry distinct shapes (including the `::` vs `:`
    /// separator) and must not be unified.
    fn resolve_parameter_sets(
        &self,
        class: &ReflectedClass,
        subject_method: &str,
        providers: &[String],
    ) -> Result<Vec<Vec<ParameterSet>>, MetadataError> {
        let mut resolved = Vec::with_capacity(providers.len());

        for provider in providers {
            // A non-success outcome from the capability is equivalent to a
            // missing method, which for a declared provider means the raw
            // value has no usable shape.
            let raw = self
                .invoker
                .invoke(&class.class, provider)
                .unwrap_or(serde_json::Value::Null);

            let sets = match &raw {
                serde_json::Value::Array(sets) => sets,
                other => {
                    return Err(MetadataError::ProviderReturnNotSequence {
                        got: json_type_name(other),
                        class: class.class.clone(),
                        method: subject_method.to_string(),
                    });
                }
            };

            let mut provider_sets = Vec::with_capacity(sets.len());
            for set in sets {
                provider_sets.push(self.lower_parameter_set(class, subject_method, set)?);
            }
            resolved.push(provider_sets);
        }

        Ok(resolved)
    }

    fn lower_parameter_set(
        &self,
        class: &ReflectedClass,
        subject_method: &str,
        raw: &serde_json::Value,
    ) -> Result<ParameterSet, MetadataError> {
        let pairs: Vec<(String, &serde_json::Value)> = match raw {
            serde_json::Value::Object(map) => {
                map.iter().map(|(k, v)| (k.clone(), v)).collect()
            }
            serde_json::Value::Array(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            other => {
                return Err(MetadataError::ParameterSetNotSequence {
                    got: json_type_name(other),
                    class: class.class.clone(),
                    method: subject_method.to_string(),
                });
            }
        };

        let mut values = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            let scalar = ParamValue::from_json(value).ok_or_else(|| {
                MetadataError::NonScalarParameterValue {
                    got: json_type_name(value),
                    class: class.class.clone(),
                    method: subject_method.to_string(),
                }
            })?;
            values.push((name, scalar));
        }

        Ok(ParameterSet::from_pairs(values))
    }
}
