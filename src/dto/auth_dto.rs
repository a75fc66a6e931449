use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::session::SessionContext;
use crate::services::authorization_service::{AccessLevel, ModulePermissions};

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub session: SessionContext,
}

// Sesión actual con el resumen de permisos
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub session: SessionContext,
    pub access_level: AccessLevel,
    pub permissions: Vec<ModulePermissions>,
}
