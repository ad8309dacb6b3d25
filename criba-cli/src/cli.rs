//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Criba CLI - Compile filter requests into SQL WHERE fragments
#[derive(Parser, Debug)]
#[command(name = "criba")]
#[command(version)]
#[command(about = "Criba CLI - Compile filter requests into SQL WHERE fragments", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a filter request into SQL fragments
    Compile(CompileArgs),

    /// Check a filter request for errors without printing SQL
    Check(CheckArgs),

    /// Display version information
    Version,
}

/// Options shared by commands that read a request and a configuration
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to the JSON filter request, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Path to the configuration file (defaults to ./criba.toml when present)
    #[arg(short, long, env = "CRIBA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Environment whose overrides to apply
    #[arg(short, long, env = "CRIBA_ENV")]
    pub env: Option<String>,
}

impl SourceArgs {
    /// Whether the request is read from stdin.
    pub fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

// =============================================================================
// Compile Command
// =============================================================================

/// Arguments for the `compile` command
#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Emit placeholders and bound parameters instead of literals
    #[arg(short, long)]
    pub placeholders: bool,

    /// Placeholder dialect (overrides the configuration)
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,
}

/// Output formats for `compile`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The full bundle as JSON
    #[default]
    Json,
    /// The non-empty fragments joined into one WHERE condition
    Sql,
}

/// Placeholder dialects
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgresql,
    Mysql,
    Sqlite,
}

impl From<Dialect> for criba_query::DatabaseType {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Postgresql => Self::PostgreSQL,
            Dialect::Mysql => Self::MySQL,
            Dialect::Sqlite => Self::SQLite,
        }
    }
}

// =============================================================================
// Check Command
// =============================================================================

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
