//! Test command implementation

use anyhow::{Context, Result};
use sqltest_core::Config;
use sqltest_runner::{quote_warning, Reporter, Runner};

use crate::cli::{GlobalArgs, TestArgs};
use crate::commands::common::{load_config, ExitCode};

/// Execute the test command
pub(crate) async fn execute(args: &TestArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let runner = Runner::new(config);
    let reporter = Reporter::new(!global.no_color);

    let filter = (!args.models.is_empty()).then_some(args.models.as_slice());
    if let Some(warning) = filter.and_then(|names| unknown_models_warning(runner.config(), names)) {
        eprintln!("{warning}");
    }
    for case in runner.gather_test_cases(filter) {
        if let Some(warning) = quote_warning(&case) {
            eprintln!("{warning}");
        }
    }

    let report = runner
        .run(filter, |case, outcome| {
            println!("{}", reporter.render_case(case, Some(outcome)));
        })
        .await
        .context("Test run aborted")?;

    println!("{}", reporter.render_summary(&report.summary));

    if !report.summary.succeeded() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Warning naming filter entries that match no configured model
fn unknown_models_warning(config: &Config, names: &[String]) -> Option<String> {
    let unknown: Vec<&str> = names
        .iter()
        .filter(|n| !config.models.iter().any(|m| m.name == **n))
        .map(String::as_str)
        .collect();
    if unknown.is_empty() {
        return None;
    }
    Some(format!("Warning: no models named: {}", unknown.join(", ")))
}

#[cfg(test)]
#[path = "test_test.rs"]
mod tests;
