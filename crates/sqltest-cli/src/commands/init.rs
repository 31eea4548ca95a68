//! Init command implementation - writes a starter configuration file

use anyhow::{Context, Result};
use serde::Serialize;
use sqltest_core::Source;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::{GlobalArgs, InitArgs};

const MODELS_DIR: &str = "models";

/// Shape of the generated configuration file
#[derive(Debug, Serialize)]
struct StarterConfig {
    source: Source,
    models_dir: String,
}

/// Execute the init command
pub(crate) fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let path = Path::new(&global.config);
    if path.exists() {
        println!("A {} config file already exists for this project", path.display());
        return Ok(());
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => prompt("Enter a data source name:")?,
    };
    let url = match &args.url {
        Some(url) => url.clone(),
        None => prompt(
            "Enter a connection URL or $VARIABLE containing the URL for the data source:",
        )?,
    };

    write_config(path, Source::new(name, url))?;
    println!("Created `{}`", path.display());
    println!("Happy testing!");
    Ok(())
}

/// Serialize a starter configuration for `source` to `path`
fn write_config(path: &Path, source: Source) -> Result<()> {
    let config = StarterConfig {
        source,
        models_dir: MODELS_DIR.to_string(),
    };
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))
}

fn prompt(message: &str) -> Result<String> {
    println!("{message}");
    print!("> ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
