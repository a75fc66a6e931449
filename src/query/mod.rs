//! Construcción de predicados de consulta
//!
//! Predicados estructurados, filtro de borrado lógico y frontera de datos por
//! rol. Todo es puro: nada aquí toca el almacén.

pub mod predicate;
pub mod scope;
pub mod soft_delete;

pub use predicate::{FieldFilter, Predicate, ScalarValue};
pub use scope::{effective_predicate, scope_query};
pub use soft_delete::{apply_soft_delete_filter, FilterMode};
