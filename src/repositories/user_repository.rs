use async_trait::async_trait;
use bcrypt::verify;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::Identity;
use crate::models::user::{Account, User};
use crate::services::auth_service::{AccountDirectory, CredentialVerifier};
use crate::utils::errors::{AppError, AppResult};

const USER_COLUMNS: &str =
    "id, email, nombre, password_hash, rol, sucursal_id, estado, deleted_at, created_at";

/// Acceso a la tabla `usuarios` para autenticación
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca por id sin filtrar el ciclo de vida: quien llama decide qué estados acepta
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM usuarios WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Las cuentas eliminadas no existen para el login
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM usuarios WHERE lower(email) = lower($1) AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl AccountDirectory for UserRepository {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        match Account::try_from(user) {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                tracing::error!("❌ Cuenta {} con datos inválidos: {}", id, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CredentialVerifier for UserRepository {
    async fn verify_credentials(&self, email: &str, secret: &str) -> AppResult<Option<Identity>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let valid = verify(secret, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;

        Ok(valid.then(|| Identity {
            user_id: user.id,
            email: user.email,
        }))
    }
}
