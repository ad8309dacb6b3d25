//! CLI configuration handling.

use std::path::{Path, PathBuf};

use criba_query::config::CONFIG_FILE_NAME;
use criba_query::CribaConfig;

use crate::error::{CliError, CliResult};

/// Resolve the configuration for a command.
///
/// An explicit path must exist. Without one, `./criba.toml` is used when
/// present, otherwise defaults apply.
pub fn load(explicit: Option<&Path>, env: Option<&str>) -> CliResult<CribaConfig> {
    let config = match config_path(explicit)? {
        Some(path) => CribaConfig::from_file(&path)?,
        None => CribaConfig::default(),
    };

    Ok(match env {
        Some(env) => config.with_environment(env),
        None => config,
    })
}

fn config_path(explicit: Option<&Path>) -> CliResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let default = std::env::current_dir()?.join(CONFIG_FILE_NAME);
    Ok(default.exists().then_some(default))
}
