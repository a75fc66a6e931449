//! Modelo de Usuario
//!
//! Este módulo contiene la fila de la tabla `usuarios` y su traducción a la
//! cuenta que consume la resolución de sesiones.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::lifecycle::LifecycleState;
use super::role::UserRole;
use super::session::SessionContext;
use crate::utils::errors::AppError;

/// Usuario - mapea exactamente a la tabla usuarios
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nombre: String,
    pub password_hash: String,
    pub rol: String,
    pub sucursal_id: Option<Uuid>,
    pub estado: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Cuenta ya tipada: rol válido y estado de ciclo de vida colapsado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub branch_id: Option<Uuid>,
    pub state: LifecycleState,
}

impl Account {
    /// Instantánea de sesión para esta cuenta
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.id, self.email.clone(), self.role, self.branch_id)
    }
}

impl TryFrom<User> for Account {
    type Error = AppError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id,
            email: user.email,
            role: user.rol.parse()?,
            branch_id: user.sucursal_id,
            state: LifecycleState::from_columns(user.estado, user.deleted_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(rol: &str, estado: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "operador@logistica.pe".to_string(),
            nombre: "Operador".to_string(),
            password_hash: "x".to_string(),
            rol: rol.to_string(),
            sucursal_id: Some(Uuid::new_v4()),
            estado,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_from_user_row() {
        let row = user("OPERADOR", false);
        let account = Account::try_from(row.clone()).unwrap();
        assert_eq!(account.role, UserRole::Operador);
        assert_eq!(account.state, LifecycleState::Inactive);
        assert_eq!(account.session().branch_id(), row.sucursal_id);
    }

    #[test]
    fn test_unknown_stored_role_is_an_error() {
        assert!(Account::try_from(user("GERENTE", true)).is_err());
    }
}
