//! Configuration file parsing for `criba.toml`.
//!
//! ```toml
//! [compiler]
//! render = "placeholder"
//! dialect = "postgresql"
//! param_offset = 0
//! default_filter_type = "numeros"
//!
//! [debug]
//! log_sql = true
//!
//! [environments.production.compiler]
//! dialect = "${CRIBA_DIALECT}"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compiler::CompilerOptions;
use crate::error::{QueryError, QueryResult};
use crate::filter::FilterType;
use crate::sql::{DatabaseType, RenderMode};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "criba.toml";

/// Main configuration structure for `criba.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CribaConfig {
    /// Compiler settings.
    #[serde(default)]
    pub compiler: CompilerOptions,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl CribaConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryError::configuration(format!("failed to read {}", path.display())).with_source(e)
        })?;
        Self::from_str(&content).map_err(|e| e.with_context(path.display().to_string()))
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> QueryResult<Self> {
        let expanded = expand_env_vars(content)?;
        toml::from_str(&expanded).map_err(|e| {
            QueryError::configuration(format!("invalid configuration: {}", e.message()))
                .with_source(e)
        })
    }

    /// Apply environment-specific overrides.
    ///
    /// An unknown environment leaves the configuration unchanged.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(compiler) = overrides.compiler {
                if let Some(render) = compiler.render {
                    self.compiler.render = render;
                }
                if let Some(dialect) = compiler.dialect {
                    self.compiler.dialect = dialect;
                }
                if let Some(offset) = compiler.param_offset {
                    self.compiler.param_offset = offset;
                }
                if let Some(filter_type) = compiler.default_filter_type {
                    self.compiler.default_filter_type = filter_type;
                }
            }
            if let Some(debug) = overrides.debug {
                if let Some(log_sql) = debug.log_sql {
                    self.debug.log_sql = log_sql;
                }
            }
        }
        self
    }

    /// The options to build a [`crate::FilterCompiler`] with.
    pub fn compiler_options(&self) -> CompilerOptions {
        self.compiler
    }
}

/// Debug/logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log every compiled fragment.
    #[serde(default)]
    pub log_sql: bool,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Compiler overrides.
    pub compiler: Option<CompilerOverride>,

    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Compiler configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerOverride {
    /// Override the render mode.
    pub render: Option<RenderMode>,
    /// Override the placeholder dialect.
    pub dialect: Option<DatabaseType>,
    /// Override the parameter offset.
    pub param_offset: Option<usize>,
    /// Override the default filter type.
    pub default_filter_type: Option<FilterType>,
}

/// Debug configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Override log_sql.
    pub log_sql: Option<bool>,
}

/// Expand environment variables in the format `${VAR_NAME}`.
///
/// Unset variables are left as written.
fn expand_env_vars(content: &str) -> QueryResult<String> {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| QueryError::internal("invalid variable pattern").with_source(e))?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let full_match = &cap[0];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_config() {
        let config = CribaConfig::default();
        assert_eq!(config.compiler.render, RenderMode::Literal);
        assert_eq!(config.compiler.dialect, DatabaseType::PostgreSQL);
        assert!(!config.debug.log_sql);
    }

    #[test]
    fn test_parse_compiler_section() {
        let toml = r#"
            [compiler]
            render = "placeholder"
            dialect = "mysql"
            param_offset = 2
            default_filter_type = "textos"
        "#;
        let config = CribaConfig::from_str(toml).unwrap();
        let options = config.compiler_options();
        assert_eq!(options.render, RenderMode::Placeholder);
        assert_eq!(options.dialect, DatabaseType::MySQL);
        assert_eq!(options.param_offset, 2);
        assert_eq!(options.default_filter_type, FilterType::Texts);
    }

    #[test]
    fn test_dialect_aliases() {
        let config = CribaConfig::from_str("[compiler]\ndialect = \"sqlite3\"").unwrap();
        assert_eq!(config.compiler.dialect, DatabaseType::SQLite);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CribaConfig::from_str("[compiler]\nrender_mode = \"literal\"").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_environment_override() {
        let toml = r#"
            [compiler]
            render = "literal"

            [environments.production.compiler]
            render = "placeholder"

            [environments.production.debug]
            log_sql = true
        "#;
        let config = CribaConfig::from_str(toml).unwrap().with_environment("production");
        assert_eq!(config.compiler.render, RenderMode::Placeholder);
        assert!(config.debug.log_sql);

        let config = CribaConfig::from_str(toml).unwrap().with_environment("staging");
        assert_eq!(config.compiler.render, RenderMode::Literal);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("CRIBA_TEST_CONFIG_DIALECT", "sqlite");
        }
        let expanded = expand_env_vars("dialect = \"${CRIBA_TEST_CONFIG_DIALECT}\"").unwrap();
        assert_eq!(expanded, "dialect = \"sqlite\"");
        unsafe {
            std::env::remove_var("CRIBA_TEST_CONFIG_DIALECT");
        }
    }

    #[test]
    fn test_unset_variable_left_alone() {
        let expanded = expand_env_vars("x = \"${CRIBA_SURELY_UNSET_VARIABLE}\"").unwrap();
        assert_eq!(expanded, "x = \"${CRIBA_SURELY_UNSET_VARIABLE}\"");
    }

    #[test]
    fn test_missing_file() {
        let err = CribaConfig::from_file("/nonexistent/criba.toml").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[debug]\nlog_sql = true\n").unwrap();
        let config = CribaConfig::from_file(&path).unwrap();
        assert!(config.debug.log_sql);
    }
}
