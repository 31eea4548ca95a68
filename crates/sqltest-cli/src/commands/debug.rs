//! Debug command implementation - checks the source connection

use anyhow::{Context, Result};
use colored::Colorize;
use sqltest_runner::Runner;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_config, ExitCode};

/// Execute the debug command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let url = config
        .source
        .resolve_url()
        .context("Failed to resolve source URL")?;
    println!("Testing connection to {} ({})", config.source.name, url);

    let runner = Runner::new(config);
    match runner.check_source().await {
        Ok(()) => {
            println!("{}", "Connection is working".green());
            Ok(())
        }
        Err(e) => {
            println!("{}", e.to_string().red());
            Err(ExitCode(1).into())
        }
    }
}
