//! # Criba
//!
//! Compile structured filter specifications into SQL `WHERE` fragments.
//!
//! Criba provides:
//! - Typed filter variants for equality, text, range, set, date, special and extra filters
//! - Fail-fast validation with stable error codes
//! - Subquery column substitution
//! - Literal embedding with escaping, or placeholders with bound parameters
//! - `criba.toml` configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use criba::prelude::*;
//!
//! let request = FilterRequest::from_json(r#"{
//!     "filtro": {"c.nombre": "Ana"},
//!     "tipo_filtro": "textos",
//!     "filtro_rango": {"c.edad": {"valor1": 18, "valor2": 30}}
//! }"#)?;
//!
//! let compiled = FilterCompiler::default().compile(&request)?;
//! assert_eq!(compiled.bundle.sentencia, "c.nombre LIKE '%Ana%'");
//! assert_eq!(compiled.bundle.filtro_rango, "c.edad BETWEEN '18' AND '30'");
//! # Ok::<(), criba::QueryError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The filter compilation engine.
pub mod query {
    pub use criba_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use criba_query::prelude::*;
    pub use criba_query::{CribaConfig, DatabaseType, RenderMode};
}

// Re-export key types at the crate root
pub use criba_query::{
    CompiledFilterBundle, CompilerOptions, CribaConfig, ErrorCode, FilterCompiler, FilterRequest,
    QueryError, QueryResult,
};
