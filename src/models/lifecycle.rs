//! Ciclo de vida de los registros
//!
//! En el almacén cada entidad guarda dos columnas independientes, `estado`
//! (booleano) y `deleted_at` (timestamp nulo). Aquí se colapsan en un único
//! estado etiquetado, de modo que la cuarta combinación ambigua no existe
//! fuera de la frontera con la base de datos.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::errors::LifecycleError;

/// Estado de un registro persistido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Active,
    Inactive,
    SoftDeleted { deleted_at: DateTime<Utc> },
}

/// Acciones que mutan el ciclo de vida (el borrado físico va aparte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Deactivate,
    Reactivate,
    SoftDelete,
    Restore,
}

/// Resultado de aplicar una acción: el nuevo estado y si hubo cambio real
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: LifecycleState,
    pub changed: bool,
}

impl LifecycleState {
    /// Traduce las columnas `estado`/`deleted_at` del almacén.
    /// `deleted_at` manda: con fecha, el registro está eliminado sea cual sea `estado`.
    pub fn from_columns(estado: bool, deleted_at: Option<DateTime<Utc>>) -> Self {
        match (deleted_at, estado) {
            (Some(deleted_at), _) => LifecycleState::SoftDeleted { deleted_at },
            (None, true) => LifecycleState::Active,
            (None, false) => LifecycleState::Inactive,
        }
    }

    /// Columnas a persistir para este estado
    pub fn to_columns(&self) -> (bool, Option<DateTime<Utc>>) {
        match self {
            LifecycleState::Active => (true, None),
            LifecycleState::Inactive => (false, None),
            LifecycleState::SoftDeleted { deleted_at } => (false, Some(*deleted_at)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Inactive => "INACTIVE",
            LifecycleState::SoftDeleted { .. } => "SOFT_DELETED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, LifecycleState::SoftDeleted { .. })
    }

    /// Aplica una acción. Las acciones sobre su propio estado destino son no-ops
    /// (`changed == false`); de SOFT_DELETED sólo se sale con `Restore`.
    pub fn apply(self, action: LifecycleAction, now: DateTime<Utc>) -> Result<Transition, LifecycleError> {
        use LifecycleAction::*;
        use LifecycleState::*;

        let next = match (self, action) {
            (Active, Deactivate) => Inactive,
            (Inactive, Reactivate) => Active,
            (Active | Inactive, SoftDelete) => SoftDeleted { deleted_at: now },
            (SoftDeleted { .. }, Restore) => Active,

            (Inactive, Deactivate)
            | (Active, Reactivate)
            | (SoftDeleted { .. }, SoftDelete)
            | (Active | Inactive, Restore) => return Ok(Transition { state: self, changed: false }),

            (SoftDeleted { .. }, Deactivate | Reactivate) => {
                return Err(LifecycleError::InvalidTransition {
                    action: action.as_str(),
                    state: self.name(),
                })
            }
        };

        Ok(Transition { state: next, changed: true })
    }
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Deactivate => "desactivar",
            LifecycleAction::Reactivate => "activar",
            LifecycleAction::SoftDelete => "eliminar",
            LifecycleAction::Restore => "restaurar",
        }
    }
}
