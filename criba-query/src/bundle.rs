//! The aggregate of every compiled fragment of one query.

use serde::{Deserialize, Serialize};

/// Compiled SQL for each filter category. An empty string means "no clause".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompiledFilterBundle {
    /// Equality or text filters.
    pub sentencia: String,
    /// Special filters.
    pub filtro_especial: String,
    /// Range filters.
    pub filtro_rango: String,
    /// Extra filters.
    pub filtro_extra: String,
    /// `IN` clause.
    #[serde(rename = "in")]
    pub in_clause: String,
    /// `NOT IN` clause.
    pub not_in: String,
    /// Not-equal filters.
    pub diferente_de: String,
    /// Date filters, parenthesized.
    pub filtro_fecha: String,
    /// Raw SQL supplied by the caller.
    pub sql_extra: String,
}

impl CompiledFilterBundle {
    /// Package pre-compiled fragments. Performs no validation.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        sentencia: impl Into<String>,
        filtro_especial: impl Into<String>,
        filtro_rango: impl Into<String>,
        filtro_extra: impl Into<String>,
        in_clause: impl Into<String>,
        not_in: impl Into<String>,
        diferente_de: impl Into<String>,
        filtro_fecha: impl Into<String>,
        sql_extra: impl Into<String>,
    ) -> Self {
        Self {
            sentencia: sentencia.into(),
            filtro_especial: filtro_especial.into(),
            filtro_rango: filtro_rango.into(),
            filtro_extra: filtro_extra.into(),
            in_clause: in_clause.into(),
            not_in: not_in.into(),
            diferente_de: diferente_de.into(),
            filtro_fecha: filtro_fecha.into(),
            sql_extra: sql_extra.into(),
        }
    }

    /// `(name, sql)` pairs in bundle order, using the wire names.
    pub fn fragments(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("sentencia", self.sentencia.as_str()),
            ("filtro_especial", self.filtro_especial.as_str()),
            ("filtro_rango", self.filtro_rango.as_str()),
            ("filtro_extra", self.filtro_extra.as_str()),
            ("in", self.in_clause.as_str()),
            ("not_in", self.not_in.as_str()),
            ("diferente_de", self.diferente_de.as_str()),
            ("filtro_fecha", self.filtro_fecha.as_str()),
            ("sql_extra", self.sql_extra.as_str()),
        ]
        .into_iter()
    }

    /// Check whether every fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.fragments().all(|(_, sql)| sql.is_empty())
    }

    /// Join the non-empty fragments with `AND`.
    ///
    /// With more than one fragment each is parenthesized, so an `OR` inside
    /// one category cannot bind to its neighbours. `filtro_fecha` is already
    /// wrapped.
    pub fn where_clause(&self) -> String {
        let parts: Vec<(&str, &str)> = self
            .fragments()
            .map(|(name, sql)| (name, sql.trim()))
            .filter(|(_, sql)| !sql.is_empty())
            .collect();

        if let [(_, only)] = parts.as_slice() {
            return only.to_string();
        }

        parts
            .iter()
            .map(|(name, sql)| match *name {
                "filtro_fecha" => sql.to_string(),
                _ => format!("({})", sql),
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
