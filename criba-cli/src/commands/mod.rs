//! CLI command implementations.

pub mod check;
pub mod compile;
pub mod version;

use tokio::io::AsyncReadExt;

use criba_query::logging::{self, LogSettings};
use criba_query::{CribaConfig, FilterRequest};

use crate::cli::SourceArgs;
use crate::config;
use crate::error::CliResult;

/// Read the request named by `source` and resolve its configuration.
///
/// Logging is installed once the configuration is known; `debug.log_sql`
/// enables info-level output.
pub(crate) async fn load(source: &SourceArgs) -> CliResult<(FilterRequest, CribaConfig)> {
    let config = config::load(source.config.as_deref(), source.env.as_deref())?;
    init_logging(&config);

    let raw = if source.is_stdin() {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(&source.input).await?
    };

    let request = FilterRequest::from_json(&raw)?;
    Ok((request, config))
}

fn init_logging(config: &CribaConfig) {
    let settings = LogSettings::from_env();
    if config.debug.log_sql && !settings.requested {
        logging::init_with(LogSettings::resolve(None, Some("info"), None));
    } else {
        logging::init_with(settings);
    }
}

/// Display name for the request source.
pub(crate) fn source_name(source: &SourceArgs) -> String {
    if source.is_stdin() {
        "<stdin>".to_string()
    } else {
        source.input.display().to_string()
    }
}
