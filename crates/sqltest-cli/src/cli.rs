//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// sqltest - declarative data quality tests for SQL sources
#[derive(Parser, Debug)]
#[command(name = "sqltest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "SQLTEST_CONFIG",
        default_value = "sqltest.yml"
    )]
    pub config: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tests of every model, or of the named models
    Test(TestArgs),

    /// Check the connection to the configured source
    Debug,

    /// Create a starter configuration file
    Init(InitArgs),
}

/// Arguments for the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Model names to test (default: all)
    pub models: Vec<String>,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Data source name (prompted for when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Connection URL, or `$VAR` naming an environment variable holding it
    /// (prompted for when omitted)
    #[arg(long)]
    pub url: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
