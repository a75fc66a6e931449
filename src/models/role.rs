use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AppError;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    AdminSucursal,
    Operador,
    Conductor,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::SuperAdmin,
        UserRole::AdminSucursal,
        UserRole::Operador,
        UserRole::Conductor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::AdminSucursal => "ADMIN_SUCURSAL",
            UserRole::Operador => "OPERADOR",
            UserRole::Conductor => "CONDUCTOR",
        }
    }

    /// Todos los roles salvo SUPER_ADMIN ven únicamente su sucursal
    pub fn requires_branch_scope(&self) -> bool {
        !matches!(self, UserRole::SuperAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "ADMIN_SUCURSAL" => Ok(UserRole::AdminSucursal),
            "OPERADOR" => Ok(UserRole::Operador),
            "CONDUCTOR" => Ok(UserRole::Conductor),
            other => Err(AppError::InvalidArgument(format!("rol desconocido: '{}'", other))),
        }
    }
}
