use serde::Serialize;
use uuid::Uuid;

use super::role::UserRole;

/// Identidad resuelta para una petición.
///
/// Se construye una vez por petición a partir de una credencial verificada y
/// se pasa explícitamente a cada predicado de autorización y a cada consulta.
/// No expone setters: nadie la modifica después de construirla.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    user_id: Uuid,
    email: String,
    role: UserRole,
    branch_id: Option<Uuid>,
}

impl SessionContext {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: UserRole, branch_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            branch_id,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn branch_id(&self) -> Option<Uuid> {
        self.branch_id
    }
}

/// Identidad devuelta por la verificación de credenciales
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}
