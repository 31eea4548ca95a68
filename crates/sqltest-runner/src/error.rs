//! Error types for sqltest-runner

use sqltest_core::CoreError;
use sqltest_db::DbError;
use thiserror::Error;

/// Errors raised while turning a test into SQL
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// T001: No test registered under this name
    #[error("[T001] Test not found: '{name}'")]
    TestNotFound { name: String },

    /// T002: Required parameter missing
    #[error("[T002] Test '{test}' requires parameter '{param}'")]
    MissingParameter { test: String, param: String },

    /// T003: Parameter present but unusable
    #[error("[T003] Invalid parameter '{param}' for test '{test}': {message}")]
    InvalidParameter {
        test: String,
        param: String,
        message: String,
    },

    /// T004: Column-level test used at model level
    #[error("[T004] Test '{test}' must be attached to a column")]
    MissingColumn { test: String },

    /// T005: None of a set of alternative parameters was given
    #[error("[T005] Test '{test}' requires at least one of: {params}")]
    MissingOneOf { test: String, params: String },
}

/// Result type alias for CompileError
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort a run before or instead of executing test cases
#[derive(Error, Debug)]
pub enum RunError {
    /// R001: A test case could not be compiled
    #[error("[R001] Invalid test {target}: {source}")]
    Compile {
        target: String,
        #[source]
        source: CompileError,
    },

    /// R002: Source definition could not be resolved
    #[error("[R002] {0}")]
    Source(#[from] CoreError),

    /// R003: Could not connect to the source
    #[error("[R003] Could not connect to source '{name}': {source}")]
    Connection {
        name: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
