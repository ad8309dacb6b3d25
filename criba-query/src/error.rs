//! Error types for filter compilation.
//!
//! Every compiler returns a [`QueryResult`]. Validation is fail-fast: the
//! first problem found aborts the whole collection, and each layer that
//! passes the error upward re-describes it with [`QueryError::wrap`] while
//! keeping the original [`ErrorCode`] and the inner error as its source.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 11xx: Filter validation errors
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use criba_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::report(ErrorCode::EmptyKey, "key is empty", "");
//! assert_eq!(err.code, ErrorCode::EmptyKey);
//! assert_eq!(err.code.code(), "P1101");
//!
//! // Wrapping keeps the code and records the inner error.
//! let wrapped = err.wrap("failed to resolve comparison");
//! assert_eq!(wrapped.code, ErrorCode::EmptyKey);
//! assert_eq!(wrapped.root().message, "key is empty");
//! ```

use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Result type for filter compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter validation errors (11xx)
    /// A filter key is empty (P1101).
    EmptyKey = 1101,
    /// A field name is empty after trimming (P1102).
    EmptyField = 1102,
    /// A value is empty after trimming (P1103).
    EmptyValue = 1103,
    /// A required attribute such as `valor1` or `operador` is absent (P1104).
    MissingRequiredAttribute = 1104,
    /// An entry has the wrong shape, e.g. a scalar where a collection is expected (P1105).
    InvalidShape = 1105,
    /// A logical operator other than `AND`/`OR` (P1106).
    InvalidLogicalOperator = 1106,
    /// A value that does not parse as a calendar date (P1107).
    InvalidDate = 1107,
    /// An unknown filter type selector (P1108).
    InvalidFilterTypeTag = 1108,
    /// A numeric key where a `table.column` field was expected (P1109).
    NumericFieldKey = 1109,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1101").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptyKey => "Empty filter key",
            Self::EmptyField => "Empty field name",
            Self::EmptyValue => "Empty value",
            Self::MissingRequiredAttribute => "Missing required attribute",
            Self::InvalidShape => "Invalid filter shape",
            Self::InvalidLogicalOperator => "Invalid logical operator",
            Self::InvalidDate => "Invalid date",
            Self::InvalidFilterTypeTag => "Invalid filter type",
            Self::NumericFieldKey => "Numeric field key",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::Internal => "Internal error",
        }
    }

    /// Whether this code belongs to the filter validation category.
    pub fn is_validation(&self) -> bool {
        (1100..1200).contains(&(*self as u16))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The filter category being compiled.
    pub operation: Option<String>,
    /// The field involved.
    pub field: Option<String>,
    /// The offending input, rendered as text.
    pub data: Option<String>,
    /// Help text.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Create new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation.
    pub fn operation(mut self, op: impl Into<String>) -> Self {
        self.operation = Some(op.into());
        self
    }

    /// Set the field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the offending data.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Errors that can occur while compiling filters.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Report a validation failure at the point where it was detected.
    ///
    /// This is the single sink every compiler goes through, so the failure is
    /// logged once with its offending data.
    pub fn report(code: ErrorCode, message: impl Into<String>, data: impl Into<String>) -> Self {
        let message = message.into();
        let data = data.into();
        debug!(code = %code, data = %data, "{}", message);
        let mut err = Self::new(code, message);
        err.context.data = Some(data);
        err
    }

    /// Re-describe this error from an outer layer.
    ///
    /// The returned error keeps the same code and carries `self` as its source.
    pub fn wrap(self, message: impl Into<String>) -> Self {
        Self {
            code: self.code,
            message: message.into(),
            context: ErrorContext {
                operation: self.context.operation.clone(),
                field: self.context.field.clone(),
                data: None,
                help: None,
            },
            source: Some(Box::new(self)),
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// A filter key is empty.
    pub fn empty_key(data: impl Into<String>) -> Self {
        Self::report(ErrorCode::EmptyKey, "filter key is empty", data)
    }

    /// A field name is empty.
    pub fn empty_field(data: impl Into<String>) -> Self {
        Self::report(ErrorCode::EmptyField, "field is empty", data)
    }

    /// A value is empty.
    pub fn empty_value(what: &str, data: impl Into<String>) -> Self {
        Self::report(ErrorCode::EmptyValue, format!("{} is empty", what), data)
    }

    /// A required attribute is missing.
    pub fn missing(attribute: &str, data: impl Into<String>) -> Self {
        Self::report(
            ErrorCode::MissingRequiredAttribute,
            format!("required attribute `{}` is missing", attribute),
            data,
        )
        .with_help(format!("add `{}` to the filter entry", attribute))
    }

    /// Wrong input shape.
    pub fn invalid_shape(message: impl Into<String>, data: impl Into<String>) -> Self {
        Self::report(ErrorCode::InvalidShape, message, data)
    }

    /// A logical operator other than `AND`/`OR`.
    pub fn invalid_logical_operator(data: impl Into<String>) -> Self {
        Self::report(
            ErrorCode::InvalidLogicalOperator,
            "logical operator must be AND or OR",
            data,
        )
    }

    /// A value that is not a calendar date.
    pub fn invalid_date(data: impl Into<String>) -> Self {
        Self::report(ErrorCode::InvalidDate, "value is not a valid date", data)
            .with_help("dates use the YYYY-MM-DD format")
    }

    /// An unknown filter type selector.
    pub fn invalid_filter_type(data: impl Into<String>) -> Self {
        Self::report(
            ErrorCode::InvalidFilterTypeTag,
            "filter type must be `numeros` or `textos`",
            data,
        )
    }

    /// A numeric key where a field reference was expected.
    pub fn numeric_key(data: impl Into<String>) -> Self {
        Self::report(
            ErrorCode::NumericFieldKey,
            "keys must be field references like table.column",
            data,
        )
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
    }

    // ============== Error Checks ==============

    /// Check if this is a filter validation error.
    pub fn is_validation(&self) -> bool {
        self.code.is_validation()
    }

    /// The wrapped inner error, if this error was produced by [`QueryError::wrap`].
    pub fn inner(&self) -> Option<&QueryError> {
        self.source.as_deref().and_then(|s| s.downcast_ref::<QueryError>())
    }

    /// The originating error at the bottom of the wrap chain.
    pub fn root(&self) -> &QueryError {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }

    /// Messages from the outermost layer down to the origin.
    pub fn chain(&self) -> Vec<&str> {
        let mut messages = vec![self.message.as_str()];
        let mut current = self;
        while let Some(inner) = current.inner() {
            messages.push(inner.message.as_str());
            current = inner;
        }
        messages
    }

    /// Display the full error with context and the wrap chain.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }

        let chain = self.chain();
        if chain.len() > 1 {
            output.push_str("\nCaused by:\n");
            for (i, message) in chain.iter().skip(1).enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, message));
            }
        }

        let root = self.root();
        if let Some(ref data) = root.context.data {
            let data_display = if data.chars().count() > 200 {
                format!("{}...", data.chars().take(200).collect::<String>())
            } else {
                data.clone()
            };
            output.push_str(&format!("\nData: {}\n", data_display));
        }

        if let Some(ref help) = root.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

/// Extension trait for re-describing errors as they cross a layer.
pub trait ResultExt<T> {
    /// Wrap the error (if any) with an outer message.
    fn wrap_err(self, message: &str) -> QueryResult<T>;
}

impl<T> ResultExt<T> for QueryResult<T> {
    fn wrap_err(self, message: &str) -> QueryResult<T> {
        self.map_err(|e| e.wrap(message))
    }
}

/// Helper for creating errors with context.
#[macro_export]
macro_rules! query_error {
    ($code:expr, $msg:expr) => {
        $crate::error::QueryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let mut err = $crate::error::QueryError::new($code, $msg);
        $(
            err = err.$key($value);
        )+
        err
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::EmptyKey.code(), "P1101");
        assert_eq!(ErrorCode::NumericFieldKey.code(), "P1109");
        assert_eq!(ErrorCode::InvalidConfiguration.code(), "P7001");
    }

    #[test]
    fn test_validation_category() {
        assert!(ErrorCode::InvalidDate.is_validation());
        assert!(!ErrorCode::Internal.is_validation());
        assert!(QueryError::empty_field("").is_validation());
    }

    #[test]
    fn test_report_keeps_data() {
        let err = QueryError::report(ErrorCode::EmptyValue, "value is empty", "  ");
        assert_eq!(err.context.data.as_deref(), Some("  "));
        assert!(err.source.is_none());
    }

    #[test]
    fn test_wrap_chain() {
        let err = QueryError::missing("valor1", "{}")
            .wrap("failed to build range condition")
            .wrap("failed to compile range filters");

        assert_eq!(err.code, ErrorCode::MissingRequiredAttribute);
        assert_eq!(err.message, "failed to compile range filters");
        assert_eq!(err.root().message, "required attribute `valor1` is missing");
        assert_eq!(err.chain().len(), 3);
    }

    #[test]
    fn test_wrap_err_on_result() {
        let result: QueryResult<()> = Err(QueryError::empty_key(""));
        let err = result.wrap_err("failed to resolve comparison").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyKey);
        assert!(err.inner().is_some());
    }

    #[test]
    fn test_display_full() {
        let err = QueryError::invalid_date("2023-13-45")
            .wrap("failed to compile date filter")
            .with_context("filtro_fecha");

        let output = err.display_full();
        assert!(output.contains("P1107"));
        assert!(output.contains("filtro_fecha"));
        assert!(output.contains("Caused by"));
        assert!(output.contains("2023-13-45"));
        assert!(output.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_error_macro() {
        let err = query_error!(
            ErrorCode::InvalidShape,
            "values must be an array",
            with_field = "status",
            with_help = "pass a JSON array"
        );

        assert_eq!(err.code, ErrorCode::InvalidShape);
        assert_eq!(err.context.field, Some("status".to_string()));
    }
}
