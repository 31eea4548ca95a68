//! Database trait definitions

use crate::error::DbResult;
use async_trait::async_trait;
use sqltest_core::TestParams;
use std::sync::Arc;

/// First row of an assertion query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureRow {
    /// Number of rows violating the assertion
    pub failures: i64,
}

/// Database abstraction trait for sqltest
///
/// Implementations must be Send + Sync for async operation. Each call
/// acquires a connection for its own duration and releases it on return.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute an assertion query and return its first row.
    ///
    /// The first column of the row is read as the failure count.
    async fn query_failures(&self, sql: &str) -> DbResult<FailureRow>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Open and immediately close a connection
    async fn ping(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Creates database handles from resolved connection URLs
pub trait Connector: Send + Sync {
    fn connect(&self, url: &str, options: &TestParams) -> DbResult<Arc<dyn Database>>;
}
