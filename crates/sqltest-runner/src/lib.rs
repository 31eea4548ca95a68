//! sqltest-runner - Assertion compilation and execution for sqltest
//!
//! Each test attached to a model or column is compiled into a single SQL
//! statement returning one row with a `failures` count. The runner executes
//! those statements against the configured source and the reporter renders
//! the outcomes.

pub mod case;
pub mod error;
pub mod generator;
pub mod params;
pub mod registry;
pub mod report;
pub mod runner;

pub use case::{CaseResult, TestCase, TestOutcome, TestStatus};
pub use error::{CompileError, CompileResult, RunError, RunResult};
pub use generator::{envelope, unescaped_quote_params, wrap_failures, Predicate};
pub use registry::{Registry, Target, TestFn};
pub use report::{format_kwargs, group_thousands, quote_warning, Reporter};
pub use runner::{RunReport, RunSummary, Runner};
