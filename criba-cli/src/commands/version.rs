//! `criba version` command - Display version information.

use crate::error::CliResult;
use crate::output;

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::header("Criba");

    output::kv("Version", env!("CARGO_PKG_VERSION"));
    output::kv("Binary", "criba");
    output::kv(
        "Build",
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    );
    output::kv("Dialects", "postgresql, mysql, sqlite");
    output::kv(
        "Log Level",
        &criba_query::logging::LogSettings::from_env().directive(),
    );

    Ok(())
}
