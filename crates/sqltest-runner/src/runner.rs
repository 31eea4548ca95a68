//! Test execution

use crate::case::{CaseResult, TestCase, TestOutcome, TestStatus};
use crate::error::{RunError, RunResult};
use crate::registry::Registry;
use sqltest_core::Config;
use sqltest_db::{Connector, Database, DefaultConnector};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Aggregate counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases executed
    pub tested: usize,

    pub passed: usize,

    /// Cases that executed and found violations
    pub failed: usize,

    /// Cases whose statement could not be executed
    pub errors: usize,

    /// Total execution time
    pub duration: Duration,
}

impl RunSummary {
    /// Create a summary from case results
    pub fn from_results(results: &[CaseResult<'_>], duration: Duration) -> Self {
        let mut summary = Self {
            duration,
            ..Self::default()
        };
        for result in results {
            match result.outcome.status {
                TestStatus::Pending => continue,
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Error => summary.errors += 1,
            }
            summary.tested += 1;
        }
        summary
    }

    /// True when every case passed. A run with no cases succeeds.
    pub fn succeeded(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Ordered outcomes of a run plus its summary
#[derive(Debug, Clone)]
pub struct RunReport<'a> {
    pub results: Vec<CaseResult<'a>>,
    pub summary: RunSummary,
}

/// Turns a configuration into test outcomes
pub struct Runner {
    config: Config,
    registry: Registry,
    connector: Box<dyn Connector>,
    db: OnceLock<Arc<dyn Database>>,
}

impl Runner {
    /// Create a runner connecting through the bundled DuckDB connector
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, Box::new(DefaultConnector))
    }

    pub fn with_connector(config: Config, connector: Box<dyn Connector>) -> Self {
        Self {
            config,
            registry: Registry::builtin(),
            connector,
            db: OnceLock::new(),
        }
    }

    /// Create a runner around an already open database
    pub fn with_database(config: Config, db: Arc<dyn Database>) -> Self {
        let runner = Self::new(config);
        let _ = runner.db.set(db);
        runner
    }

    /// Replace the test registry
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The database handle, connecting on first use.
    ///
    /// The handle is kept for the lifetime of the runner. A `$VAR` source
    /// URL is resolved from the environment before connecting.
    pub fn database(&self) -> RunResult<Arc<dyn Database>> {
        if let Some(db) = self.db.get() {
            return Ok(Arc::clone(db));
        }

        let source = &self.config.source;
        let url = source.resolve_url()?;
        log::debug!("Connecting to source '{}'", source.name);
        let db = self
            .connector
            .connect(&url, &source.kwargs)
            .map_err(|e| RunError::Connection {
                name: source.name.clone(),
                source: e,
            })?;
        Ok(Arc::clone(self.db.get_or_init(|| db)))
    }

    /// Collect the test cases of every model, or of the named models only.
    ///
    /// Each model contributes its model-level tests followed by its
    /// column tests, in configuration order.
    pub fn gather_test_cases(&self, models: Option<&[String]>) -> Vec<TestCase<'_>> {
        let mut cases = Vec::new();
        for model in &self.config.models {
            if let Some(names) = models {
                if !names.iter().any(|n| *n == model.name) {
                    continue;
                }
            }
            for test in &model.tests {
                cases.push(TestCase::new(model, None, test));
            }
            for column in &model.columns {
                for test in &column.tests {
                    cases.push(TestCase::new(model, Some(column), test));
                }
            }
        }
        cases
    }

    fn compile(&self, case: &TestCase<'_>) -> RunResult<String> {
        case.sql(&self.registry).map_err(|e| RunError::Compile {
            target: case.label(),
            source: e,
        })
    }

    /// Compile and execute a single test case.
    ///
    /// Execution errors are captured in the outcome; only compile and
    /// connection errors are returned.
    pub async fn run_test(&self, case: &TestCase<'_>) -> RunResult<TestOutcome> {
        let sql = self.compile(case)?;
        let db = self.database()?;
        Ok(execute(db.as_ref(), sql).await)
    }

    /// Run every gathered case sequentially.
    ///
    /// All cases are compiled before any is executed, so an invalid test
    /// aborts the run up front. `on_complete` is called after each case.
    pub async fn run<F>(
        &self,
        models: Option<&[String]>,
        mut on_complete: F,
    ) -> RunResult<RunReport<'_>>
    where
        F: FnMut(&TestCase<'_>, &TestOutcome),
    {
        let start = Instant::now();
        let compiled = self
            .gather_test_cases(models)
            .into_iter()
            .map(|case| self.compile(&case).map(|sql| (case, sql)))
            .collect::<RunResult<Vec<_>>>()?;

        log::info!("Running {} test case(s)", compiled.len());

        let mut results = Vec::with_capacity(compiled.len());
        if !compiled.is_empty() {
            let db = self.database()?;
            for (case, sql) in compiled {
                let outcome = execute(db.as_ref(), sql).await;
                on_complete(&case, &outcome);
                results.push(CaseResult { case, outcome });
            }
        }

        let summary = RunSummary::from_results(&results, start.elapsed());
        log::info!(
            "Finished {} test case(s): {} passed, {} failed, {} errors",
            summary.tested,
            summary.passed,
            summary.failed,
            summary.errors
        );
        Ok(RunReport { results, summary })
    }

    /// Check that the source accepts connections
    pub async fn check_source(&self) -> RunResult<()> {
        let db = self.database()?;
        db.ping().await.map_err(|e| RunError::Connection {
            name: self.config.source.name.clone(),
            source: e,
        })
    }
}

async fn execute(db: &dyn Database, sql: String) -> TestOutcome {
    let start = Instant::now();
    match db.query_failures(&sql).await {
        Ok(row) => TestOutcome::from_row(sql, row, start.elapsed()),
        Err(e) => {
            log::debug!("Test statement failed on {}: {}", db.db_type(), e);
            TestOutcome::error(sql, e.to_string(), start.elapsed())
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
