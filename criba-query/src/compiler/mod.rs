//! Filter compilers, one module per filter category.
//!
//! Each category module exposes free functions that compile with literal
//! rendering (`compile_*`), which is what most callers need. [`FilterCompiler`]
//! wraps the same compilers with configured [`CompilerOptions`]: the render
//! mode, the placeholder dialect, the starting parameter index and a
//! replaceable [`InClauseSyntax`].
//!
//! ```rust
//! use criba_query::{CompilerOptions, FilterCompiler, RenderMode, DatabaseType, RangeFilter, FilterMap};
//!
//! let compiler = FilterCompiler::new(CompilerOptions {
//!     render: RenderMode::Placeholder,
//!     dialect: DatabaseType::PostgreSQL,
//!     ..Default::default()
//! });
//!
//! let mut ranges = FilterMap::new();
//! ranges.insert("t.age".to_string(), RangeFilter::new(18, 65));
//!
//! let fragment = compiler.ranges(&ranges).unwrap();
//! assert_eq!(fragment.sql(), "t.age BETWEEN $1 AND $2");
//! assert_eq!(fragment.params().len(), 2);
//! ```

pub mod comparison;
pub mod conjunction;
pub mod date;
pub mod not_equal;
pub mod range;
pub mod set;
pub mod special;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bundle::CompiledFilterBundle;
use crate::error::{QueryResult, ResultExt};
use crate::filter::{
    ColumnMap, DateFilter, EqualityFilter, ExtraFilter, FilterGroup, FilterMap, FilterType,
    FilterValue, RangeFilter, SetFilter, SpecialFilter,
};
use crate::input;
use crate::request::{CompiledRequest, FilterRequest};
use crate::sql::{DatabaseType, Fragment, RenderMode, Renderer};
use crate::validation::{InClauseSyntax, StandardInSyntax};

/// The separator to put between `acc` and the next condition.
///
/// Empty for an empty accumulator, `" AND "` otherwise.
pub fn and_join(acc: &str) -> &'static str {
    if acc.is_empty() { "" } else { " AND " }
}

/// Options for a [`FilterCompiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// Literal embedding or placeholders.
    pub render: RenderMode,
    /// Placeholder style in placeholder mode.
    pub dialect: DatabaseType,
    /// Parameters already bound before the first placeholder.
    pub param_offset: usize,
    /// Equality filter mode when a request does not name one.
    pub default_filter_type: FilterType,
}

/// Compiles filters with a fixed set of options.
///
/// Immutable after construction; every call owns its renderer, so one
/// compiler can be shared across threads.
#[derive(Debug)]
pub struct FilterCompiler {
    options: CompilerOptions,
    in_syntax: Box<dyn InClauseSyntax>,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl FilterCompiler {
    /// Create a compiler with the standard `IN` syntax.
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            in_syntax: Box::new(StandardInSyntax),
        }
    }

    /// Replace the `IN` / `NOT IN` syntax.
    pub fn with_in_syntax(mut self, syntax: impl InClauseSyntax + 'static) -> Self {
        self.in_syntax = Box::new(syntax);
        self
    }

    /// The configured options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    fn run<F>(&self, offset: usize, f: F) -> QueryResult<Fragment>
    where
        F: FnOnce(&mut Renderer) -> QueryResult<String>,
    {
        let mut renderer = Renderer::new(self.options.render, self.options.dialect, offset);
        let sql = f(&mut renderer)?;
        Ok(renderer.finish(sql))
    }

    fn start(&self) -> usize {
        self.options.param_offset
    }

    /// Equality or text filters.
    pub fn conjunction(
        &self,
        filters: &FilterMap<EqualityFilter>,
        filter_type: FilterType,
        columns: &ColumnMap,
    ) -> QueryResult<Fragment> {
        self.run(self.start(), |r| {
            conjunction::render_conjunction(r, filters, filter_type, columns)
        })
    }

    /// Range filters.
    pub fn ranges(&self, filters: &FilterMap<RangeFilter>) -> QueryResult<Fragment> {
        self.run(self.start(), |r| range::render_ranges(r, filters))
    }

    /// An `IN` filter.
    pub fn in_clause(&self, filter: &SetFilter) -> QueryResult<Fragment> {
        self.run(self.start(), |r| {
            set::render_set(r, self.in_syntax.as_ref(), &filter.key, &filter.values, false)
        })
    }

    /// A `NOT IN` filter.
    pub fn not_in_clause(&self, filter: &SetFilter) -> QueryResult<Fragment> {
        self.run(self.start(), |r| {
            set::render_set(r, self.in_syntax.as_ref(), &filter.key, &filter.values, true)
        })
    }

    /// Date filters.
    pub fn dates(&self, filters: &[DateFilter]) -> QueryResult<Fragment> {
        self.run(self.start(), |r| date::render_dates(r, filters))
    }

    /// Special filters.
    pub fn special(
        &self,
        groups: &[FilterGroup<SpecialFilter>],
        columns: &ColumnMap,
    ) -> QueryResult<Fragment> {
        self.run(self.start(), |r| special::render_special(r, groups, columns))
    }

    /// Extra filters.
    pub fn extra(&self, groups: &[FilterGroup<ExtraFilter>]) -> QueryResult<Fragment> {
        self.run(self.start(), |r| special::render_extra(r, groups))
    }

    /// Not-equal filters.
    pub fn not_equal(&self, filters: &FilterMap<FilterValue>) -> QueryResult<Fragment> {
        self.run(self.start(), |r| not_equal::render_not_equal(r, filters))
    }

    /// Compile every category of a request into a bundle.
    ///
    /// Categories are compiled in bundle order and placeholder numbering
    /// continues from one category to the next. The first failing category
    /// aborts the whole request.
    pub fn compile(&self, request: &FilterRequest) -> QueryResult<CompiledRequest> {
        let mut params: Vec<FilterValue> = Vec::new();
        let columns = &request.columns;
        let syntax = self.in_syntax.as_ref();

        let filter_type = match request.filter_type.as_deref() {
            Some(raw) => raw.parse::<FilterType>().map_err(|e| e.with_context("tipo_filtro"))?,
            None => self.options.default_filter_type,
        };

        let sentence = self.stage(
            "filtro",
            &mut params,
            input::equality_filters(request.filter.as_ref()),
            |r, filters| conjunction::render_conjunction(r, filters, filter_type, columns),
        )?;
        let special_sql = self.stage(
            "filtro_especial",
            &mut params,
            input::special_groups(request.special.as_ref()),
            |r, groups| special::render_special(r, groups, columns),
        )?;
        let range_sql = self.stage(
            "filtro_rango",
            &mut params,
            input::range_filters(request.range.as_ref()),
            range::render_ranges,
        )?;
        let extra_sql = self.stage(
            "filtro_extra",
            &mut params,
            input::extra_groups(request.extra.as_ref()),
            |r, groups| special::render_extra(r, groups),
        )?;
        let in_sql = self.stage(
            "in",
            &mut params,
            input::set_filter(request.in_set.as_ref()),
            |r, filter| match filter {
                Some(f) => set::render_set(r, syntax, &f.key, &f.values, false),
                None => Ok(String::new()),
            },
        )?;
        let not_in_sql = self.stage(
            "not_in",
            &mut params,
            input::set_filter(request.not_in.as_ref()),
            |r, filter| match filter {
                Some(f) => set::render_set(r, syntax, &f.key, &f.values, true),
                None => Ok(String::new()),
            },
        )?;
        let not_equal_sql = self.stage(
            "diferente_de",
            &mut params,
            input::not_equal_filters(request.not_equal.as_ref()),
            not_equal::render_not_equal,
        )?;
        let date_sql = self.stage(
            "filtro_fecha",
            &mut params,
            input::date_filters(request.dates.as_ref()),
            |r, filters| date::render_dates(r, filters),
        )?;

        let sql_extra = request.sql_extra.clone().unwrap_or_default();

        let bundle = CompiledFilterBundle::assemble(
            sentence,
            special_sql,
            range_sql,
            extra_sql,
            in_sql,
            not_in_sql,
            not_equal_sql,
            date_sql,
            sql_extra,
        );
        debug!(
            render = ?self.options.render,
            params = params.len(),
            fragments = bundle.fragments().filter(|(_, sql)| !sql.is_empty()).count(),
            "compiled filter request"
        );
        Ok(CompiledRequest { bundle, params })
    }

    /// Compile one request category, continuing the parameter numbering.
    fn stage<T>(
        &self,
        category: &str,
        params: &mut Vec<FilterValue>,
        intake: QueryResult<T>,
        render: impl FnOnce(&mut Renderer, &T) -> QueryResult<String>,
    ) -> QueryResult<String> {
        let offset = self.start() + params.len();
        let fragment = intake
            .and_then(|value| self.run(offset, |r| render(r, &value)))
            .wrap_err(&format!("failed to compile {}", category))
            .map_err(|e| e.with_context(category))?;
        params.extend(fragment.params);
        Ok(fragment.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(value: serde_json::Value) -> FilterRequest {
        FilterRequest::from_json(&value.to_string()).unwrap()
    }

    #[test]
    fn test_and_join() {
        assert_eq!(and_join(""), "");
        assert_eq!(and_join("x = 1"), " AND ");
    }

    #[test]
    fn test_default_options() {
        let options = CompilerOptions::default();
        assert_eq!(options.render, RenderMode::Literal);
        assert_eq!(options.param_offset, 0);
        assert_eq!(options.default_filter_type, FilterType::Numbers);
    }

    #[test]
    fn test_methods_use_param_offset() {
        let compiler = FilterCompiler::new(CompilerOptions {
            render: RenderMode::Placeholder,
            param_offset: 3,
            ..Default::default()
        });
        let fragment = compiler.in_clause(&SetFilter::new("t.c", ["a", "b"])).unwrap();
        assert_eq!(fragment.sql(), "t.c IN ($4,$5)");
    }

    #[test]
    fn test_compile_literal_request() {
        let req = request(json!({
            "filtro": {"t.a": "1", "t.b": {"value": "x", "comparacion": "<>", "operador": "OR"}},
            "filtro_rango": {"t.age": {"valor1": 18, "valor2": 65}},
            "in": {"llave": "t.cat", "values": ["1", "2"]},
            "not_in": {"llave": "t.cat", "values": []},
            "filtro_fecha": [{"campo_1": "t.ini", "campo_2": "t.fin", "fecha": "2024-03-01"}],
            "sql_extra": "t.deleted_at IS NULL"
        }));

        let compiled = FilterCompiler::default().compile(&req).unwrap();
        let bundle = compiled.bundle;
        assert_eq!(bundle.sentencia, "t.a = '1' OR t.b <> 'x'");
        assert_eq!(bundle.filtro_rango, "t.age BETWEEN '18' AND '65'");
        assert_eq!(bundle.in_clause, "t.cat IN ('1','2')");
        assert_eq!(bundle.not_in, "");
        assert_eq!(bundle.filtro_fecha, "('2024-03-01' >= t.ini AND '2024-03-01' <= t.fin)");
        assert_eq!(bundle.sql_extra, "t.deleted_at IS NULL");
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn test_compile_threads_placeholders() {
        let req = request(json!({
            "filtro": {"t.a": 1},
            "filtro_rango": {"t.b": {"valor1": 1, "valor2": 9}},
            "diferente_de": {"t.c": "x"}
        }));
        let compiler = FilterCompiler::new(CompilerOptions {
            render: RenderMode::Placeholder,
            ..Default::default()
        });
        let compiled = compiler.compile(&req).unwrap();
        assert_eq!(compiled.bundle.sentencia, "t.a = $1");
        assert_eq!(compiled.bundle.filtro_rango, "t.b BETWEEN $2 AND $3");
        assert_eq!(compiled.bundle.diferente_de, "t.c <> $4");
        assert_eq!(compiled.params.len(), 4);
    }

    #[test]
    fn test_compile_text_mode() {
        let req = request(json!({"filtro": {"t.name": "Jo"}, "tipo_filtro": "textos"}));
        let compiled = FilterCompiler::default().compile(&req).unwrap();
        assert_eq!(compiled.bundle.sentencia, "t.name LIKE '%Jo%'");
    }

    #[test]
    fn test_compile_default_filter_type_option() {
        let req = request(json!({"filtro": {"t.name": "Jo"}}));
        let compiler = FilterCompiler::new(CompilerOptions {
            default_filter_type: FilterType::Texts,
            ..Default::default()
        });
        assert_eq!(compiler.compile(&req).unwrap().bundle.sentencia, "t.name LIKE '%Jo%'");
    }

    #[test]
    fn test_compile_bad_filter_type() {
        let req = request(json!({"tipo_filtro": "fechas"}));
        let err = FilterCompiler::default().compile(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFilterTypeTag);
        assert_eq!(err.context.operation.as_deref(), Some("tipo_filtro"));
    }

    #[test]
    fn test_compile_fails_fast_with_category() {
        let req = request(json!({
            "filtro_rango": {"t.b": {"valor1": 1}},
            "filtro_fecha": [{"campo_1": "a", "campo_2": "b", "fecha": "nope"}]
        }));
        let err = FilterCompiler::default().compile(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredAttribute);
        assert_eq!(err.message, "failed to compile filtro_rango");
        assert_eq!(err.context.operation.as_deref(), Some("filtro_rango"));
    }

    #[test]
    fn test_compile_uses_column_map() {
        let req = request(json!({
            "filtro": {"total": {"value": 5, "comparacion": ">"}},
            "columnas_extra": {"total": "(SELECT COUNT(*) FROM pago p)"}
        }));
        let compiled = FilterCompiler::default().compile(&req).unwrap();
        assert_eq!(compiled.bundle.sentencia, "(SELECT COUNT(*) FROM pago p) > '5'");
    }
}
