#![warn(missing_docs)]
//! Cadence Storage - Historical Results
//!
//! The repository persists and queries result-adjacent rows in a relational
//! historical store. The concrete engine lives behind the
//! `Connection`/`ConnectionManager` interfaces; the repository owns only
//! its row representations and never the runner's result tree.
//!
//! Constraint filtering goes through the expression crate's `SqlTranslator`
//! so that asserting a constraint and filtering history by it always agree.

mod connection;
mod repository;

pub use connection::{Connection, ConnectionManager, Row, StorageError};
pub use repository::{HistoryEntry, Repository};
