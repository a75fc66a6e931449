use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::query::FilterMode;

// Parámetros de listado: ?estado=activos|eliminados|todos&page=1&per_page=20
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    pub estado: Option<String>,

    #[validate(range(min = 1, max = 1_000_000))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 200))]
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub const DEFAULT_PER_PAGE: i64 = 20;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE)
    }

    /// Nunca negativo ni desbordado, aunque la query no haya pasado por `validate`
    pub fn offset(&self) -> i64 {
        self.page()
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.per_page().max(0))
    }
}

// Response de listados paginados
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Value>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub filter: FilterMode,
}

// Parámetros de lectura individual: ?estado=activos|eliminados|todos
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    pub estado: Option<String>,
}
