//! Repository over the historical-results store.
//!
//! Retrieval mirrors the store schema: `run`, `environment`,
//! `sgroup`/`sgroup_subject`, `parameter`/`variant_parameter`, `subject`,
//! `variant`, `iteration`. Parameter values are JSON-encoded at rest.

use cadence_core::ParamValue;
use cadence_expr::{Constraint, ConstraintVisitor, SqlTranslator};
use cadence_runner::SuiteResult;
use fxhash::FxHashMap;

use crate::connection::{Connection, ConnectionManager, Row, StorageError};

/// One row of run history, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Run id
    pub run_id: i64,
    /// Run date as stored
    pub run_date: String,
    /// User-supplied run context, if any
    pub context: Option<String>,
    /// VCS branch recorded in the run environment, if any
    pub vcs_branch: Option<String>,
}

/// Persists and queries result-adjacent rows.
///
/// Does not own result trees; it owns only the row representations built by
/// translating result and constraint data.
pub struct Repository<M> {
    manager: M,
    translator: SqlTranslator,
}

impl<M: ConnectionManager> Repository<M> {
    /// Create a repository over a connection manager.
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            translator: SqlTranslator::new(),
        }
    }

    /// Access the underlying connection manager.
    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Fetch iteration rows matching a constraint.
    ///
    /// The constraint is lowered by the query translator; filtering by a
    /// constraint agrees with evaluating it against a measurement.
    pub fn iteration_rows(&self, constraint: &Constraint) -> Result<Vec<Row>, StorageError> {
        let (predicate, values) = self.translator.visit(constraint);
        let sql = format!("SELECT * FROM iteration WHERE {}", predicate);
        self.manager.connection()?.query(&sql, &values)
    }

    /// Fetch the environment rows recorded for a run.
    pub fn run_env_rows(&self, run_id: i64) -> Result<Vec<Row>, StorageError> {
        let sql = "SELECT * FROM environment WHERE run_id = ?";
        self.manager
            .connection()?
            .query(sql, &[ParamValue::Int(run_id)])
    }

    /// Group names attached to a subject, in storage order.
    pub fn groups(&self, subject_id: i64) -> Result<Vec<String>, StorageError> {
        let sql = "SELECT name FROM sgroup \
                   LEFT JOIN sgroup_subject ON sgroup.id = sgroup_subject.sgroup_id \
                   WHERE sgroup_subject.subject_id = ?";
        let rows = self
            .manager
            .connection()?
            .query(sql, &[ParamValue::Int(subject_id)])?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.get("name")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .collect())
    }

    /// Parameters of a variant: key to JSON-decoded value.
    pub fn parameters(
        &self,
        variant_id: i64,
    ) -> Result<FxHashMap<String, serde_json::Value>, StorageError> {
        let sql = "SELECT key, value FROM parameter \
                   LEFT JOIN variant_parameter ON variant_parameter.parameter_id = parameter.id \
                   WHERE variant_parameter.variant_id = ?";
        let rows = self
            .manager
            .connection()?
            .query(sql, &[ParamValue::Int(variant_id)])?;

        let mut parameters = FxHashMap::default();
        for row in rows {
            let key = match row.get("key").and_then(|v| v.as_str()) {
                Some(key) => key.to_string(),
                None => continue,
            };
            let encoded = row
                .get("value")
                .and_then(|v| v.as_str())
                .unwrap_or("null");
            parameters.insert(key, serde_json::from_str(encoded)?);
        }
        Ok(parameters)
    }

    /// Run history, newest run first, with the VCS branch joined in from the
    /// environment rows keyed by provider `vcs` / key `branch`.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let sql = "SELECT run.id AS run_id, run.date AS run_date, run.context AS context, \
                   environment.value AS vcs_branch \
                   FROM run \
                   LEFT OUTER JOIN environment ON environment.provider = 'vcs' \
                   AND environment.run_id = run.id AND environment.key = 'branch' \
                   ORDER BY run.id DESC";
        let rows = self.manager.connection()?.query(sql, &[])?;

        Ok(rows
            .into_iter()
            .map(|row| HistoryEntry {
                run_id: row.get("run_id").and_then(|v| v.as_i64()).unwrap_or(0),
                run_date: row
                    .get("run_date")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                context: row
                    .get("context")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                vcs_branch: row
                    .get("vcs_branch")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            })
            .collect())
    }

    /// Persist a suite result together with its environment rows, returning
    /// the new run id.
    ///
    /// Times are stored in the microsecond base, matching the translator's
    /// bound values; parameter values are JSON-encoded.
    pub fn persist_suite(
        &self,
        suite: &SuiteResult,
        environment: &[(String, String, String)],
    ) -> Result<i64, StorageError> {
        let conn = self.manager.connection()?;

        let run_id = conn.execute(
            "INSERT INTO run (date, context) VALUES (?, ?)",
            &[
                ParamValue::Str(suite.date.to_rfc3339()),
                match &suite.context {
                    Some(context) => ParamValue::Str(context.clone()),
                    None => ParamValue::Null,
                },
            ],
        )?;

        for (provider, key, value) in environment {
            conn.execute(
                "INSERT INTO environment (run_id, provider, key, value) VALUES (?, ?, ?, ?)",
                &[
                    ParamValue::Int(run_id),
                    ParamValue::Str(provider.clone()),
                    ParamValue::Str(key.clone()),
                    ParamValue::Str(value.clone()),
                ],
            )?;
        }

        // Group rows are shared: one `sgroup` row per distinct name, with
        // `sgroup_subject` linking every tagged subject to it.
        let mut sgroup_ids: FxHashMap<String, i64> = FxHashMap::default();

        for benchmark in suite.benchmark_results() {
            for subject in &benchmark.subjects {
                let subject_id = conn.execute(
                    "INSERT INTO subject (run_id, benchmark, name) VALUES (?, ?, ?)",
                    &[
                        ParamValue::Int(run_id),
                        ParamValue::Str(benchmark.class.clone()),
                        ParamValue::Str(subject.method.clone()),
                    ],
                )?;

                for group in &subject.groups {
                    let sgroup_id = match sgroup_ids.get(group) {
                        Some(id) => *id,
                        None => {
                            let id = conn.execute(
                                "INSERT INTO sgroup (name) VALUES (?)",
                                &[ParamValue::Str(group.clone())],
                            )?;
                            sgroup_ids.insert(group.clone(), id);
                            id
                        }
                    };
                    conn.execute(
                        "INSERT INTO sgroup_subject (sgroup_id, subject_id) VALUES (?, ?)",
                        &[ParamValue::Int(sgroup_id), ParamValue::Int(subject_id)],
                    )?;
                }

                for variant in &subject.variants {
                    let variant_id = conn.execute(
                        "INSERT INTO variant (subject_id) VALUES (?)",
                        &[ParamValue::Int(subject_id)],
                    )?;

                    for (name, value) in variant.parameter_set.iter() {
                        let encoded = serde_json::to_string(&value.to_json())?;
                        let parameter_id = conn.execute(
                            "INSERT INTO parameter (key, value) VALUES (?, ?)",
                            &[
                                ParamValue::Str(name.to_string()),
                                ParamValue::Str(encoded),
                            ],
                        )?;
                        conn.execute(
                            "INSERT INTO variant_parameter (variant_id, parameter_id) VALUES (?, ?)",
                            &[ParamValue::Int(variant_id), ParamValue::Int(parameter_id)],
                        )?;
                    }

                    for iteration in &variant.iterations {
                        conn.execute(
                            "INSERT INTO iteration (variant_id, time, memory) VALUES (?, ?, ?)",
                            &[
                                ParamValue::Int(variant_id),
                                ParamValue::Float(iteration.elapsed_micros),
                                ParamValue::Int(iteration.memory_delta),
                            ],
                        )?;
                    }
                }
            }
        }

        Ok(run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::ParameterSet;
    use cadence_expr::{Comparator, Constraint, TimeValue, Value};
    use cadence_runner::{BenchmarkResult, Iteration, SubjectResult, VariantResult};
    use serde_json::json;
    use std::cell::RefCell;

    /// Connection that records statements and replays canned rows.
    #[derive(Default)]
    struct MockConnection {
        statements: RefCell<Vec<(String, Vec<ParamValue>)>>,
        rows: RefCell<Vec<Vec<Row>>>,
        next_id: RefCell<i64>,
    }

    impl MockConnection {
        fn with_rows(rows: Vec<Row>) -> Self {
            let conn = Self::default();
            conn.rows.borrow_mut().push(rows);
            conn
        }

        fn statements(&self) -> Vec<(String, Vec<ParamValue>)> {
            self.statements.borrow().clone()
        }
    }

    impl Connection for MockConnection {
        fn query(&self, sql: &str, params: &[ParamValue]) -> Result<Vec<Row>, StorageError> {
            self.statements
                .borrow_mut()
                .push((sql.to_string(), params.to_vec()));
            Ok(self.rows.borrow_mut().pop().unwrap_or_default())
        }

        fn execute(&self, sql: &str, params: &[ParamValue]) -> Result<i64, StorageError> {
            self.statements
                .borrow_mut()
                .push((sql.to_string(), params.to_vec()));
            *self.next_id.borrow_mut() += 1;
            Ok(*self.next_id.borrow())
        }
    }

    struct MockManager {
        conn: MockConnection,
    }

    impl ConnectionManager for MockManager {
        fn connection(&self) -> Result<&dyn Connection, StorageError> {
            Ok(&self.conn)
        }
    }

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_iteration_rows_uses_translated_predicate() {
        let repo = Repository::new(MockManager {
            conn: MockConnection::default(),
        });

        let constraint = Constraint::compare(
            "time",
            Comparator::Lt,
            Value::Time(TimeValue::new(2.0, "milliseconds").unwrap()),
        );
        repo.iteration_rows(&constraint).unwrap();

        let statements = repo.manager.conn.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].0, "SELECT * FROM iteration WHERE time < ?");
        assert_eq!(statements[0].1, vec![ParamValue::Float(2_000.0)]);
    }

    #[test]
    fn test_groups_are_ordered_names() {
        let rows = vec![
            row(&[("name", json!("core"))]),
            row(&[("name", json!("slow"))]),
        ];
        let repo = Repository::new(MockManager {
            conn: MockConnection::with_rows(rows),
        });

        let groups = repo.groups(7).unwrap();
        assert_eq!(groups, vec!["core".to_string(), "slow".to_string()]);

        let statements = repo.manager.conn.statements();
        assert!(statements[0].0.contains("LEFT JOIN sgroup_subject"));
        assert_eq!(statements[0].1, vec![ParamValue::Int(7)]);
    }

    #[test]
    fn test_parameters_are_json_decoded() {
        let rows = vec![
            row(&[("key", json!("size")), ("value", json!("1024"))]),
            row(&[("key", json!("label")), ("value", json!("\"big\""))]),
        ];
        let repo = Repository::new(MockManager {
            conn: MockConnection::with_rows(rows),
        });

        let parameters = repo.parameters(3).unwrap();
        assert_eq!(parameters.get("size"), Some(&json!(1024)));
        assert_eq!(parameters.get("label"), Some(&json!("big")));
    }

    #[test]
    fn test_history_joins_vcs_branch() {
        let rows = vec![row(&[
            ("run_id", json!(42)),
            ("run_date", json!("2016-02-01T12:00:00+00:00")),
            ("context", json!("ci")),
            ("vcs_branch", json!("main")),
        ])];
        let repo = Repository::new(MockManager {
            conn: MockConnection::with_rows(rows),
        });

        let history = repo.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].run_id, 42);
        assert_eq!(history[0].vcs_branch.as_deref(), Some("main"));

        let statements = repo.manager.conn.statements();
        let sql = &statements[0].0;
        assert!(sql.contains("ORDER BY run.id DESC"));
        assert!(sql.contains("environment.provider = 'vcs'"));
        assert!(sql.contains("environment.key = 'branch'"));
    }

    fn subject_in_groups(method: &str, groups: &[&str]) -> SubjectResult {
        SubjectResult {
            method: method.to_string(),
            description: String::new(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            variants: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn test_shared_group_persists_one_sgroup_row() {
        // Two subjects tagged "core": one sgroup row, two link rows, both
        // pointing at the same group id.
        let suite = cadence_runner::SuiteResult {
            date: chrono::Utc::now(),
            context: None,
            benchmark_results: vec![BenchmarkResult {
                class: "TestBench".to_string(),
                path: "/path/to/bench.rs".into(),
                subjects: vec![
                    subject_in_groups("bench_foo", &["core"]),
                    subject_in_groups("bench_bar", &["core", "slow"]),
                ],
                error: None,
            }],
        };

        let repo = Repository::new(MockManager {
            conn: MockConnection::default(),
        });
        repo.persist_suite(&suite, &[]).unwrap();

        let statements = repo.manager().conn.statements();
        let sgroup_inserts: Vec<_> = statements
            .iter()
            .filter(|(sql, _)| sql.starts_with("INSERT INTO sgroup "))
            .collect();
        assert_eq!(sgroup_inserts.len(), 2);
        assert_eq!(
            sgroup_inserts[0].1,
            vec![ParamValue::Str("core".to_string())]
        );
        assert_eq!(
            sgroup_inserts[1].1,
            vec![ParamValue::Str("slow".to_string())]
        );

        let links: Vec<_> = statements
            .iter()
            .filter(|(sql, _)| sql.starts_with("INSERT INTO sgroup_subject"))
            .collect();
        assert_eq!(links.len(), 3);
        // "core" links from both subjects share the same sgroup id.
        assert_eq!(links[0].1[0], links[1].1[0]);
        // The "slow" link points at its own row.
        assert_ne!(links[1].1[0], links[2].1[0]);
    }

    #[test]
    fn test_persist_suite_writes_row_hierarchy() {
        let suite = cadence_runner::SuiteResult {
            date: chrono::Utc::now(),
            context: Some("ci".to_string()),
            benchmark_results: vec![BenchmarkResult {
                class: "TestBench".to_string(),
                path: "/path/to/bench.rs".into(),
                subjects: vec![SubjectResult {
                    method: "bench_foo".to_string(),
                    description: String::new(),
                    groups: vec!["core".to_string()],
                    variants: vec![VariantResult {
                        parameter_set: ParameterSet::from_pairs(vec![(
                            "foo".to_string(),
                            ParamValue::Str("bar".to_string()),
                        )]),
                        iterations: vec![Iteration {
                            index: 0,
                            parameters: ParameterSet::new(),
                            elapsed_micros: 12.5,
                            memory_delta: 64,
                        }],
                    }],
                    error: None,
                }],
                error: None,
            }],
        };

        let repo = Repository::new(MockManager {
            conn: MockConnection::default(),
        });
        let run_id = repo
            .persist_suite(&suite, &[("vcs".into(), "branch".into(), "main".into())])
            .unwrap();
        assert_eq!(run_id, 1);

        let statements = repo.manager.conn.statements();
        let sqls: Vec<&str> = statements.iter().map(|(s, _)| s.as_str()).collect();
        assert!(sqls[0].starts_with("INSERT INTO run"));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO environment")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO subject")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO sgroup ")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO sgroup_subject")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO variant ")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO parameter ")));
        assert!(sqls
            .iter()
            .any(|s| s.starts_with("INSERT INTO variant_parameter")));
        assert!(sqls.iter().any(|s| s.starts_with("INSERT INTO iteration")));
    }
}
