//! Criba CLI - Command-line interface for the Criba filter compiler.

use clap::Parser;

use criba_cli::cli::{Cli, Command};
use criba_cli::commands;
use criba_cli::error::CliResult;
use criba_cli::output;

#[tokio::main]
async fn main() {
    // Run the CLI and handle errors
    if let Err(e) = run().await {
        output::newline_err();
        output::error(&e.to_string());
        if let Some(help) = e.help_text() {
            output::hint(&help);
        }
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile(args) => commands::compile::run(args).await,
        Command::Check(args) => commands::check::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
