//! # criba-query
//!
//! Filter compilation engine for Criba.
//!
//! This crate turns structured filter specifications into SQL `WHERE`
//! fragments:
//! - Equality and text (`LIKE`) conjunctions with per-entry AND/OR
//! - `BETWEEN` ranges, with literal or field-reference bounds
//! - `IN` / `NOT IN` sets
//! - Date-within-period conditions
//! - Per-column special and extra filters
//! - Subquery column substitution
//! - Literal or placeholder rendering
//!
//! ## Compiling Filters
//!
//! Each category has a free function that embeds escaped literals:
//!
//! ```rust
//! use criba_query::compiler::{range::compile_range, set::compile_in};
//! use criba_query::RangeFilter;
//!
//! let sql = compile_range("t.age", &RangeFilter::new(18, 65)).unwrap();
//! assert_eq!(sql, "t.age BETWEEN '18' AND '65'");
//!
//! let sql = compile_in("t.cat", &["10".into(), "20".into()]).unwrap();
//! assert_eq!(sql, "t.cat IN ('10','20')");
//! ```
//!
//! ## Whole Requests
//!
//! A [`FilterRequest`] carries every category at once and compiles to a
//! [`CompiledFilterBundle`]:
//!
//! ```rust
//! use criba_query::{FilterCompiler, FilterRequest};
//!
//! let request = FilterRequest::from_json(r#"{
//!     "filtro": {"t.status": "activo"},
//!     "not_in": {"llave": "t.id", "values": [3, 4]}
//! }"#).unwrap();
//!
//! let compiled = FilterCompiler::default().compile(&request).unwrap();
//! assert_eq!(compiled.bundle.sentencia, "t.status = 'activo'");
//! assert_eq!(compiled.bundle.not_in, "t.id NOT IN ('3','4')");
//! ```
//!
//! ## Errors
//!
//! Compilation is fail-fast. Every error carries an [`ErrorCode`] that
//! survives wrapping:
//!
//! ```rust
//! use criba_query::{compiler::date::compile_date, DateFilter, ErrorCode};
//!
//! let err = compile_date(&DateFilter::new("t.ini", "t.fin", "yesterday")).unwrap_err();
//! assert_eq!(err.code, ErrorCode::InvalidDate);
//! ```

pub mod bundle;
pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod logging;
pub mod request;
pub mod sql;
pub mod validation;

pub use bundle::CompiledFilterBundle;
pub use compiler::{and_join, CompilerOptions, FilterCompiler};
pub use config::CribaConfig;
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, ResultExt};
pub use filter::{
    is_numeric_key, Bound, ColumnMap, DateFilter, EqualityFilter, ExtraFilter, FilterGroup,
    FilterMap, FilterType, FilterValue, LogicalOperator, RangeFilter, SetFilter, SpecialFilter,
};
pub use request::{CompiledRequest, FilterRequest};
pub use sql::{escape_literal, DatabaseType, Fragment, RenderMode, Renderer};
pub use validation::{validate_date, validate_keys_exist, InClauseSyntax, StandardInSyntax};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compiler::conjunction::{compile_and, compile_and_texts, compile_conjunction};
    pub use crate::compiler::date::{compile_date, compile_dates};
    pub use crate::compiler::not_equal::compile_not_equal;
    pub use crate::compiler::range::{compile_range, compile_ranges};
    pub use crate::compiler::set::{compile_in, compile_not_in};
    pub use crate::compiler::special::{compile_extra, compile_special};
    pub use crate::{
        ColumnMap, CompiledFilterBundle, CompilerOptions, DateFilter, EqualityFilter, ErrorCode,
        ExtraFilter, FilterCompiler, FilterGroup, FilterMap, FilterRequest, FilterType,
        FilterValue, QueryError, QueryResult, RangeFilter, SetFilter, SpecialFilter,
    };
}
