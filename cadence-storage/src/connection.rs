//! Storage connection interfaces.
//!
//! The relational engine and its lifecycle are collaborator-owned. The core
//! takes an explicitly passed connection-manager handle; the connection is
//! opened once per process/session and reused for all reads. There is no
//! concurrent writer, so no in-process lock is required.

use cadence_core::ParamValue;
use fxhash::FxHashMap;
use thiserror::Error;

/// One fetched row: column name to cell value.
pub type Row = FxHashMap<String, serde_json::Value>;

/// Storage-facing errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The connection could not be acquired.
    #[error("storage connection failed: {0}")]
    Connection(String),

    /// A statement failed to prepare or execute.
    #[error("query failed: {message} (sql: {sql})")]
    Query {
        /// Engine-provided detail
        message: String,
        /// Offending statement
        sql: String,
    },

    /// A stored cell could not be decoded.
    #[error("failed to decode stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A live connection able to run parameterized statements.
pub trait Connection {
    /// Run a query with positional `?` placeholders, returning all rows.
    fn query(&self, sql: &str, params: &[ParamValue]) -> Result<Vec<Row>, StorageError>;

    /// Run a statement with positional `?` placeholders, returning the
    /// last inserted row id.
    fn execute(&self, sql: &str, params: &[ParamValue]) -> Result<i64, StorageError>;
}

/// Hands out the session connection, scoped per query.
pub trait ConnectionManager {
    /// Acquire the connection for one statement.
    fn connection(&self) -> Result<&dyn Connection, StorageError>;
}
