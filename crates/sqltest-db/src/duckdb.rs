//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, FailureRow};
use async_trait::async_trait;
use duckdb::Connection;
use sqltest_core::TestParams;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        Self::in_memory_with_options(&TestParams::new())
    }

    /// Create a new in-memory DuckDB connection with engine settings
    pub fn in_memory_with_options(options: &TestParams) -> DbResult<Self> {
        let config = build_config(options)?;
        let conn = Connection::open_in_memory_with_flags(config)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        Self::from_path_with_options(path, &TestParams::new())
    }

    /// Create a new DuckDB connection from a file path with engine settings
    pub fn from_path_with_options(path: &Path, options: &TestParams) -> DbResult<Self> {
        let config = build_config(options)?;
        let conn = Connection::open_with_flags(path, config)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Acquire the connection for the duration of one call
    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Query the failure row synchronously
    fn query_failures_sync(&self, sql: &str) -> DbResult<FailureRow> {
        let conn = self.lock()?;
        let failures: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(FailureRow { failures })
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Open a second connection to the same database and drop it
    fn ping_sync(&self) -> DbResult<()> {
        let conn = self.lock()?;
        let second = conn
            .try_clone()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        second
            .execute_batch("SELECT 1")
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        drop(second);
        Ok(())
    }
}

/// Translate source options into DuckDB configuration settings
fn build_config(options: &TestParams) -> DbResult<duckdb::Config> {
    let mut config = duckdb::Config::default();
    for (key, value) in options {
        config = config
            .with(key, &value.to_raw_sql())
            .map_err(|e| DbError::InvalidOption {
                key: key.clone(),
                message: e.to_string(),
            })?;
    }
    Ok(config)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn query_failures(&self, sql: &str) -> DbResult<FailureRow> {
        self.query_failures_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn ping(&self) -> DbResult<()> {
        self.ping_sync()
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
