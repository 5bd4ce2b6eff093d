//! Integration tests for Cadence
//!
//! These tests drive the full pipeline - reflection, metadata validation,
//! execution, constraint checking, persistence - against an in-memory
//! benchmark class.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use cadence::{
    ClassReflector, Comparator, Connection, ConnectionManager, Constraint, ConstraintVisitor,
    DynError, Evaluator, InvokeError, IterationContext, Measurement, MetadataFactory,
    MethodInvoker, NullSink, ParamValue, ReflectedClass, ReflectedSubject, Repository, Row,
    Runner, StorageError, SubjectDispatcher, SubjectInstance, TimeValue, Value,
};
use serde_json::json;

/// Observable side effects of the in-memory benchmark class.
#[derive(Default)]
struct CaseState {
    calls: RefCell<Vec<String>>,
    bench_called: Cell<bool>,
    before_called: Cell<bool>,
}

/// An in-memory benchmark class: one subject with a before-method, a static
/// class-level hook, and a parameter provider yielding two sets.
#[derive(Clone, Default)]
struct ConsumerHarness {
    state: Rc<CaseState>,
}

impl ConsumerHarness {
    fn class() -> ReflectedClass {
        ReflectedClass {
            path: "/benchmarks/consumer_bench.rs".into(),
            class: "ConsumerBench".to_string(),
            is_abstract: false,
            before_class_methods: vec!["init_env".to_string()],
            after_class_methods: Vec::new(),
            subjects: vec![ReflectedSubject {
                method: "bench_consume".to_string(),
                description: "consume a payload".to_string(),
                iterations: 2,
                param_providers: vec!["provide_params".to_string()],
                before_methods: vec!["before_consume".to_string()],
                after_methods: Vec::new(),
                groups: vec!["core".to_string()],
            }],
        }
    }
}

impl ClassReflector for ConsumerHarness {
    fn reflect(&self, _path: &Path) -> Option<ReflectedClass> {
        Some(Self::class())
    }
}

impl MethodInvoker for ConsumerHarness {
    fn exists(&self, _class: &str, method: &str) -> bool {
        matches!(
            method,
            "init_env" | "before_consume" | "bench_consume" | "provide_params"
        )
    }

    fn is_static(&self, _class: &str, method: &str) -> bool {
        method == "init_env" || method == "provide_params"
    }

    fn invoke(&self, class: &str, method: &str) -> Result<serde_json::Value, InvokeError> {
        match method {
            "provide_params" => Ok(json!([{ "length": 1 }, { "length": 4 }])),
            _ => Err(InvokeError::new(class, method, "not a provider")),
        }
    }
}

struct ConsumerInstance {
    state: Rc<CaseState>,
}

impl SubjectInstance for ConsumerInstance {
    fn call(&mut self, method: &str, ctx: &IterationContext<'_>) -> Result<(), DynError> {
        self.state.calls.borrow_mut().push(method.to_string());
        match method {
            "before_consume" => self.state.before_called.set(true),
            "bench_consume" => {
                // The parameter set must reach the benchmarked method.
                assert!(ctx.parameters.get("length").is_some());
                self.state.bench_called.set(true);
            }
            other => return Err(format!("unknown method {}", other).into()),
        }
        Ok(())
    }
}

impl SubjectDispatcher for ConsumerHarness {
    fn instantiate(&self, _class: &str) -> Result<Box<dyn SubjectInstance>, DynError> {
        Ok(Box::new(ConsumerInstance {
            state: Rc::clone(&self.state),
        }))
    }

    fn call_static(&self, _class: &str, method: &str) -> Result<(), DynError> {
        self.state.calls.borrow_mut().push(format!("static:{}", method));
        Ok(())
    }
}

/// Connection stub recording everything that is executed against it.
#[derive(Default)]
struct RecordingConnection {
    statements: RefCell<Vec<(String, Vec<ParamValue>)>>,
    next_id: Cell<i64>,
}

impl Connection for RecordingConnection {
    fn query(&self, sql: &str, params: &[ParamValue]) -> Result<Vec<Row>, StorageError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(Vec::new())
    }

    fn execute(&self, sql: &str, params: &[ParamValue]) -> Result<i64, StorageError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        self.next_id.set(self.next_id.get() + 1);
        Ok(self.next_id.get())
    }
}

struct RecordingManager {
    conn: RecordingConnection,
}

impl ConnectionManager for RecordingManager {
    fn connection(&self) -> Result<&dyn Connection, StorageError> {
        Ok(&self.conn)
    }
}

#[test]
fn test_factory_to_runner_pipeline() {
    let harness = ConsumerHarness::default();
    let factory = MetadataFactory::new(harness.clone(), harness.clone());

    let metadata = factory
        .metadata_for_file(Path::new("/benchmarks/consumer_bench.rs"))
        .unwrap()
        .unwrap();
    assert_eq!(metadata.class, "ConsumerBench");
    assert_eq!(metadata.subjects.len(), 1);

    let runner = Runner::new(harness.clone(), NullSink);
    let suite = runner.run_all(&[metadata]);

    // One provider with two sets, two iterations each: 2 variants, 4 records.
    let subject = &suite.benchmark_results()[0].subjects[0];
    assert!(subject.error.is_none());
    assert_eq!(subject.variants.len(), 2);
    assert_eq!(subject.iteration_count(), 4);
    assert_eq!(
        subject.variants[0].parameter_set.get("length"),
        Some(&ParamValue::Int(1))
    );
    assert_eq!(
        subject.variants[1].parameter_set.get("length"),
        Some(&ParamValue::Int(4))
    );

    assert!(harness.state.bench_called.get());
    assert!(harness.state.before_called.get());

    // Class hook first, then before/bench pairs for every iteration.
    let calls = harness.state.calls.borrow();
    assert_eq!(calls[0], "static:init_env");
    assert_eq!(
        calls.iter().filter(|c| *c == "bench_consume").count(),
        4
    );
    assert_eq!(
        calls.iter().filter(|c| *c == "before_consume").count(),
        4
    );
}

#[test]
fn test_unknown_before_method_is_rejected() {
    let harness = ConsumerHarness::default();
    let factory = MetadataFactory::new(harness.clone(), harness);

    let mut class = ConsumerHarness::class();
    class.subjects[0].before_methods = vec!["not_exists".to_string()];

    let err = factory.build(&class).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown before method \"not_exists\" in benchmark class \"ConsumerBench\""
    );
}

#[test]
fn test_suite_persists_and_constraints_agree() {
    let harness = ConsumerHarness::default();
    let factory = MetadataFactory::new(harness.clone(), harness.clone());
    let metadata = factory
        .metadata_for_file(Path::new("/benchmarks/consumer_bench.rs"))
        .unwrap()
        .unwrap();

    let runner = Runner::new(harness, NullSink);
    let suite = runner.run_all(&[metadata]);

    // Assert the suite against a generous wall-time constraint.
    let limit = Constraint::compare(
        "time",
        Comparator::Lt,
        Value::Time(TimeValue::new(1.0, "hours").unwrap()),
    );
    let variant = &suite.benchmark_results()[0].subjects[0].variants[0];
    let mut measurement = Measurement::new();
    measurement.set_time("time", variant.mean_micros().unwrap());
    assert!(Evaluator::new(&measurement).visit(&limit).unwrap());

    // Persist the run, then filter history by the same constraint.
    let repo = Repository::new(RecordingManager {
        conn: RecordingConnection::default(),
    });
    let run_id = repo
        .persist_suite(&suite, &[("vcs".into(), "branch".into(), "main".into())])
        .unwrap();
    assert!(run_id > 0);
    repo.iteration_rows(&limit).unwrap();

    let statements = repo_statements(&repo);
    assert!(statements[0].0.starts_with("INSERT INTO run"));
    // 2 variants x 2 iterations persisted.
    assert_eq!(
        statements
            .iter()
            .filter(|(sql, _)| sql.starts_with("INSERT INTO iteration"))
            .count(),
        4
    );
    let (filter_sql, bound) = statements.last().unwrap();
    assert_eq!(filter_sql, "SELECT * FROM iteration WHERE time < ?");
    assert_eq!(bound, &vec![ParamValue::Float(3_600_000_000.0)]);
}

fn repo_statements(repo: &Repository<RecordingManager>) -> Vec<(String, Vec<ParamValue>)> {
    repo.manager().conn.statements.borrow().clone()
}
