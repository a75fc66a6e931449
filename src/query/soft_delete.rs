//! Filtro de borrado lógico
//!
//! Transformaciones puras sobre un `Predicate` según el modo de filtrado.

use serde::Serialize;
use std::str::FromStr;

use super::predicate::{FieldFilter, Predicate};
use crate::utils::errors::AppError;

pub const DELETED_AT: &str = "deleted_at";

/// Qué estados de borrado lógico incluye una lectura
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    #[default]
    ActiveOnly,
    DeletedOnly,
    All,
}

impl FilterMode {
    /// Parámetro ausente = `ActiveOnly`; parámetro presente pero desconocido = error
    pub fn from_param(param: Option<&str>) -> Result<Self, AppError> {
        match param {
            None => Ok(FilterMode::default()),
            Some(raw) => raw.parse(),
        }
    }
}

impl FromStr for FilterMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activos" | "ACTIVE_ONLY" => Ok(FilterMode::ActiveOnly),
            "eliminados" | "DELETED_ONLY" => Ok(FilterMode::DeletedOnly),
            "todos" | "ALL" => Ok(FilterMode::All),
            other => Err(AppError::InvalidArgument(format!(
                "modo de filtro desconocido: '{}' (use activos, eliminados o todos)",
                other
            ))),
        }
    }
}

/// Aumenta el predicado con la condición de `deleted_at` del modo dado
pub fn apply_soft_delete_filter(predicate: Predicate, mode: FilterMode) -> Predicate {
    match mode {
        FilterMode::ActiveOnly => predicate.with(DELETED_AT, FieldFilter::IsNull),
        FilterMode::DeletedOnly => predicate.with(DELETED_AT, FieldFilter::IsNotNull),
        FilterMode::All => predicate,
    }
}
