//! Predicados estructurados
//!
//! Un `Predicate` es una conjunción de cláusulas guardada en un conjunto
//! ordenado: añadir cláusulas en cualquier orden produce el mismo valor, lo que
//! hace conmutativas las composiciones de filtro por sucursal y de borrado
//! lógico. Se traduce a SQL con `QueryBuilder` (sólo binds, columnas estáticas)
//! y a un objeto JSON del estilo `{ "deletedAt": null }`.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use sqlx::{Postgres, QueryBuilder};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Valor comparable en una cláusula de igualdad
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarValue {
    Uuid(Uuid),
    Text(String),
    Bool(bool),
    Int(i64),
}

/// Condición sobre una columna
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldFilter {
    IsNull,
    IsNotNull,
    Equals(ScalarValue),
}

/// Cláusula de la conjunción
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
    Field(&'static str, FieldFilter),
    /// Disyunción de condiciones simples (pertenencia origen/destino)
    AnyOf(BTreeSet<(&'static str, FieldFilter)>),
}

/// Conjunción de cláusulas; vacía equivale a "todas las filas"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: BTreeSet<Clause>,
}

impl From<Uuid> for ScalarValue {
    fn from(value: Uuid) -> Self {
        ScalarValue::Uuid(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Añade una condición sobre una columna
    pub fn with(mut self, column: &'static str, filter: FieldFilter) -> Self {
        self.clauses.insert(Clause::Field(column, filter));
        self
    }

    pub fn equals(self, column: &'static str, value: impl Into<ScalarValue>) -> Self {
        self.with(column, FieldFilter::Equals(value.into()))
    }

    /// Añade una disyunción; una disyunción de un solo término se guarda como condición simple
    pub fn with_any_of(mut self, alternatives: impl IntoIterator<Item = (&'static str, FieldFilter)>) -> Self {
        let alternatives: BTreeSet<_> = alternatives.into_iter().collect();
        match alternatives.len() {
            0 => {}
            1 => {
                if let Some((column, filter)) = alternatives.into_iter().next() {
                    self.clauses.insert(Clause::Field(column, filter));
                }
            }
            _ => {
                self.clauses.insert(Clause::AnyOf(alternatives));
            }
        }
        self
    }

    /// Escribe el predicado como expresión SQL sobre el alias de tabla dado
    pub fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>, alias: &str) {
        if self.clauses.is_empty() {
            builder.push("TRUE");
            return;
        }

        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                builder.push(" AND ");
            }
            match clause {
                Clause::Field(column, filter) => push_condition(builder, alias, column, filter),
                Clause::AnyOf(alternatives) => {
                    builder.push("(");
                    for (i, (column, filter)) in alternatives.iter().enumerate() {
                        if i > 0 {
                            builder.push(" OR ");
                        }
                        push_condition(builder, alias, column, filter);
                    }
                    builder.push(")");
                }
            }
        }
    }

    /// Representación JSON del predicado
    pub fn to_json(&self) -> Value {
        let mut by_column: BTreeMap<&'static str, Vec<&FieldFilter>> = BTreeMap::new();
        let mut groups = Vec::new();

        for clause in &self.clauses {
            match clause {
                Clause::Field(column, filter) => by_column.entry(*column).or_default().push(filter),
                Clause::AnyOf(alternatives) => groups.push(alternatives),
            }
        }

        let mut object = Map::new();
        let mut conjunction = Vec::new();

        for (column, filters) in by_column {
            let key = camel_case(column);
            match filters.as_slice() {
                [single] => {
                    object.insert(key, filter_json(single));
                }
                many => {
                    for filter in many {
                        conjunction.push(json!({ key.clone(): filter_json(filter) }));
                    }
                }
            }
        }

        let group_json = |alternatives: &BTreeSet<(&'static str, FieldFilter)>| {
            Value::Array(
                alternatives
                    .iter()
                    .map(|(column, filter)| json!({ camel_case(column): filter_json(filter) }))
                    .collect(),
            )
        };

        match groups.as_slice() {
            [] => {}
            [single] => {
                object.insert("OR".to_string(), group_json(*single));
            }
            many => {
                for group in many {
                    conjunction.push(json!({ "OR": group_json(*group) }));
                }
            }
        }

        if !conjunction.is_empty() {
            object.insert("AND".to_string(), Value::Array(conjunction));
        }

        Value::Object(object)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, alias: &str, column: &str, filter: &FieldFilter) {
    builder.push(format!("{}.{}", alias, column));
    match filter {
        FieldFilter::IsNull => {
            builder.push(" IS NULL");
        }
        FieldFilter::IsNotNull => {
            builder.push(" IS NOT NULL");
        }
        FieldFilter::Equals(value) => {
            builder.push(" = ");
            match value {
                ScalarValue::Uuid(v) => builder.push_bind(*v),
                ScalarValue::Text(v) => builder.push_bind(v.clone()),
                ScalarValue::Bool(v) => builder.push_bind(*v),
                ScalarValue::Int(v) => builder.push_bind(*v),
            };
        }
    }
}

fn filter_json(filter: &FieldFilter) -> Value {
    match filter {
        FieldFilter::IsNull => Value::Null,
        FieldFilter::IsNotNull => json!({ "not": null }),
        FieldFilter::Equals(value) => scalar_json(value),
    }
}

fn scalar_json(value: &ScalarValue) -> Value {
    match value {
        ScalarValue::Uuid(v) => Value::String(v.to_string()),
        ScalarValue::Text(v) => Value::String(v.clone()),
        ScalarValue::Bool(v) => Value::Bool(*v),
        ScalarValue::Int(v) => json!(v),
    }
}

/// `sucursal_origen_id` -> `sucursalOrigenId`
fn camel_case(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper = false;
    for ch in column.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
