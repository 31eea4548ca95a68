//! Connection URL handling for the bundled DuckDB backend

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::traits::{Connector, Database};
use sqltest_core::TestParams;
use std::path::PathBuf;
use std::sync::Arc;

const DUCKDB_SCHEME: &str = "duckdb://";
const MEMORY: &str = ":memory:";

/// Where a DuckDB connection should point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Memory,
    Path(PathBuf),
}

/// Parse a resolved source URL.
///
/// Accepts `duckdb://<path>`, `duckdb://:memory:`, `:memory:` and bare
/// filesystem paths. Any other `scheme://` is rejected.
pub fn parse_url(url: &str) -> DbResult<ConnectionTarget> {
    let rest = match url.strip_prefix(DUCKDB_SCHEME) {
        Some(rest) => rest,
        None if url.contains("://") => {
            return Err(DbError::UnsupportedUrl {
                url: url.to_string(),
                reason: "only duckdb:// URLs are supported".to_string(),
            })
        }
        None => url,
    };

    if rest.is_empty() || rest == MEMORY {
        Ok(ConnectionTarget::Memory)
    } else {
        Ok(ConnectionTarget::Path(PathBuf::from(rest)))
    }
}

/// Connector backed by [`DuckDbBackend`]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnector;

impl Connector for DefaultConnector {
    fn connect(&self, url: &str, options: &TestParams) -> DbResult<Arc<dyn Database>> {
        let backend = match parse_url(url)? {
            ConnectionTarget::Memory => {
                log::debug!("Opening in-memory DuckDB database");
                DuckDbBackend::in_memory_with_options(options)?
            }
            ConnectionTarget::Path(path) => {
                log::debug!("Opening DuckDB database at {}", path.display());
                DuckDbBackend::from_path_with_options(&path, options)?
            }
        };
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
#[path = "connector_test.rs"]
mod tests;
