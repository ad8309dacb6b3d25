//! CLI error types and result alias.

use criba_query::{ErrorCode, QueryError};
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(criba::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(criba::config))]
    Config(String),

    /// The request could not be compiled
    #[error("{message}")]
    #[diagnostic(code(criba::compile))]
    Compile {
        /// Engine error code, e.g. `P1106`
        code: String,
        /// Full description including the wrap chain
        message: String,
        /// Help text from the originating error
        #[help]
        help: Option<String>,
    },

    /// Output error
    #[error("Output error: {0}")]
    #[diagnostic(code(criba::output))]
    Output(String),
}

impl CliError {
    /// Help text to show under the error, if any.
    pub fn help_text(&self) -> Option<String> {
        match self {
            CliError::Compile { help, .. } => help.clone(),
            _ => None,
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        if err.code == ErrorCode::InvalidConfiguration {
            let mut message = err.message.clone();
            if let Some(path) = err.context.operation.as_deref() {
                message = format!("{} ({})", message, path);
            }
            return CliError::Config(message);
        }

        let chain = err.chain();
        let mut message = format!("[{}] {}", err.code.code(), chain.join(": "));
        if let Some(op) = err.context.operation.as_deref() {
            message.push_str(&format!(" (in `{}`)", op));
        }
        if let Some(data) = err.root().context.data.as_deref().filter(|d| !d.is_empty()) {
            message.push_str(&format!("\n  data: {}", data));
        }

        CliError::Compile {
            code: err.code.code(),
            message,
            help: err.root().context.help.clone(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(format!("Failed to serialize JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_message() {
        let err = QueryError::invalid_logical_operator("XOR")
            .wrap("failed to compile filtro_especial")
            .with_context("filtro_especial");
        let cli: CliError = err.into();
        let text = cli.to_string();
        assert!(text.starts_with("[P1106] failed to compile filtro_especial: logical operator"));
        assert!(text.contains("(in `filtro_especial`)"));
        assert!(text.contains("data: XOR"));
    }

    #[test]
    fn test_configuration_error_maps_to_config() {
        let err = QueryError::configuration("invalid configuration: bad").with_context("criba.toml");
        let cli: CliError = err.into();
        assert!(matches!(cli, CliError::Config(_)));
        assert!(cli.to_string().contains("criba.toml"));
    }

    #[test]
    fn test_help_text() {
        let cli: CliError = QueryError::invalid_date("x").into();
        assert!(cli.help_text().unwrap().contains("YYYY-MM-DD"));
    }
}
