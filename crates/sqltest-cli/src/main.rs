//! sqltest CLI - declarative data quality tests for SQL sources

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{debug, init, test};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not load .env: {e}");
        }
    }
    if cli.global.no_color {
        colored::control::set_override(false);
    }

    match &cli.command {
        cli::Commands::Test(args) => test::execute(args, &cli.global).await,
        cli::Commands::Debug => debug::execute(&cli.global).await,
        cli::Commands::Init(args) => init::execute(args, &cli.global),
    }
}
