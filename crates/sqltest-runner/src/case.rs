//! Test cases and their outcomes

use crate::error::CompileResult;
use crate::registry::Registry;
use sqltest_core::{Model, ModelColumn, ModelTest};
use sqltest_db::FailureRow;
use std::fmt;
use std::time::Duration;

/// One test bound to the model (and column) it checks.
///
/// A case is a description only; running it produces a separate
/// [`TestOutcome`].
#[derive(Debug, Clone, Copy)]
pub struct TestCase<'a> {
    pub model: &'a Model,
    pub column: Option<&'a ModelColumn>,
    pub test: &'a ModelTest,
}

impl<'a> TestCase<'a> {
    pub fn new(model: &'a Model, column: Option<&'a ModelColumn>, test: &'a ModelTest) -> Self {
        Self {
            model,
            column,
            test,
        }
    }

    /// `schema.model[.column]: test`
    pub fn label(&self) -> String {
        match self.column {
            Some(column) => format!(
                "{}.{}.{}: {}",
                self.model.schema, self.model.name, column.name, self.test.name
            ),
            None => format!(
                "{}.{}: {}",
                self.model.schema, self.model.name, self.test.name
            ),
        }
    }

    /// Compile this case into its `failures` statement
    pub fn sql(&self, registry: &Registry) -> CompileResult<String> {
        registry.compile(self.model, self.column, self.test)
    }
}

impl fmt::Display for TestCase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Classification of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// Not run yet
    Pending,
    /// Ran and found no violating rows
    Passed,
    /// Ran and found at least one violating row
    Failed,
    /// The statement could not be executed
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one test case
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub status: TestStatus,

    /// Statement that was executed
    pub sql: String,

    /// Row returned by the statement, if it executed
    pub result: Option<FailureRow>,

    /// Execution error message
    pub error: Option<String>,

    pub duration: Duration,
}

impl TestOutcome {
    /// Outcome of a statement that executed and returned a row
    pub fn from_row(sql: String, row: FailureRow, duration: Duration) -> Self {
        let status = if row.failures == 0 {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        Self {
            status,
            sql,
            result: Some(row),
            error: None,
            duration,
        }
    }

    /// Outcome of a statement that failed to execute
    pub fn error(sql: String, error: String, duration: Duration) -> Self {
        Self {
            status: TestStatus::Error,
            sql,
            result: None,
            error: Some(error),
            duration,
        }
    }

    pub fn has_been_run(&self) -> bool {
        self.status != TestStatus::Pending
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    pub fn is_error(&self) -> bool {
        self.status == TestStatus::Error
    }

    /// Violating row count, when the statement executed
    pub fn failures(&self) -> Option<i64> {
        self.result.map(|row| row.failures)
    }
}

/// A case paired with its outcome
#[derive(Debug, Clone)]
pub struct CaseResult<'a> {
    pub case: TestCase<'a>,
    pub outcome: TestOutcome,
}

#[cfg(test)]
#[path = "case_test.rs"]
mod tests;
