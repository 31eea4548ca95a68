//! sqltest-db - Database abstraction layer for sqltest
//!
//! This crate provides the `Database` trait the runner executes assertions
//! through, the `Connector` that turns a source URL into a database handle,
//! and the DuckDB implementation of both.

pub mod connector;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use connector::{parse_url, ConnectionTarget, DefaultConnector};
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Connector, Database, FailureRow};
