//! SQL generation utilities: literal escaping, placeholders and fragments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::FilterValue;

/// Escape a string for embedding inside a single-quoted SQL literal.
///
/// Backslash-escapes `'`, `"`, `\` and turns NUL into `\0`. Total over
/// strings; an absent value escapes to the empty string.
pub fn escape_literal(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Quote an already-escaped value as a SQL string literal.
#[inline]
pub fn quote(escaped: &str) -> String {
    format!("'{}'", escaped)
}

/// Build a parameter placeholder for a given database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// PostgreSQL uses $1, $2, etc.
    #[default]
    #[serde(alias = "postgres")]
    PostgreSQL,
    /// MySQL uses ?, ?, etc.
    MySQL,
    /// SQLite uses ?, ?, etc.
    #[serde(alias = "sqlite3")]
    SQLite,
}

impl DatabaseType {
    /// Get the parameter placeholder for this database type.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }
}

/// How quoted values end up in the compiled SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Escape and embed values as `'...'` literals.
    #[default]
    Literal,
    /// Emit placeholders and collect the values as bound parameters.
    Placeholder,
}

/// Turns values into SQL text for one compilation call.
///
/// Every position that would hold a single-quoted literal goes through
/// [`Renderer::literal`], so escaping happens exactly once and placeholder
/// mode binds exactly the values literal mode would embed.
#[derive(Debug, Clone)]
pub struct Renderer {
    mode: RenderMode,
    db_type: DatabaseType,
    offset: usize,
    params: Vec<FilterValue>,
}

impl Renderer {
    /// Create a renderer.
    ///
    /// `offset` is the number of parameters already bound by earlier
    /// fragments of the same statement.
    pub fn new(mode: RenderMode, db_type: DatabaseType, offset: usize) -> Self {
        Self {
            mode,
            db_type,
            offset,
            params: Vec::new(),
        }
    }

    /// A renderer that embeds escaped literals.
    pub fn literal_mode() -> Self {
        Self::new(RenderMode::Literal, DatabaseType::default(), 0)
    }

    /// Render text such as a field name or a `LIKE` pattern in a literal
    /// position. Placeholder mode binds it as a string.
    pub fn literal(&mut self, raw: &str) -> String {
        match self.mode {
            RenderMode::Literal => quote(&escape_literal(raw)),
            RenderMode::Placeholder => self.bind(FilterValue::String(raw.to_string())),
        }
    }

    /// Render a caller-supplied value in a literal position.
    ///
    /// Placeholder mode binds the value with its type; literal mode embeds
    /// its textual form.
    pub fn value(&mut self, value: &FilterValue) -> String {
        match self.mode {
            RenderMode::Literal => quote(&escape_literal(&value.as_text())),
            RenderMode::Placeholder => self.bind(value.clone()),
        }
    }

    fn bind(&mut self, value: FilterValue) -> String {
        self.params.push(value);
        self.db_type.placeholder(self.offset + self.params.len())
    }

    /// Parameters bound so far.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Finish with the compiled SQL text.
    pub fn finish(self, sql: String) -> Fragment {
        Fragment {
            sql,
            params: self.params,
        }
    }
}

/// A compiled SQL fragment with its bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    /// The SQL text.
    pub sql: String,
    /// Bound parameters, in placeholder order. Empty in literal mode.
    pub params: Vec<FilterValue>,
}

impl Fragment {
    /// Check whether the fragment produced no SQL.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Get the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the bound parameters.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
