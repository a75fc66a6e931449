use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::auth_dto::{LoginData, LoginRequest};
use crate::models::session::{Identity, SessionContext};
use crate::models::user::Account;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{AppResult, AuthenticationError};

/// Directorio de cuentas: resuelve el id de un token a la cuenta almacenada
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// Verificación de credenciales; opaca para el resto del sistema
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify_credentials(&self, email: &str, secret: &str) -> AppResult<Option<Identity>>;
}

/// Servicio de autenticación
pub struct AuthService<S> {
    jwt: JwtService,
    store: S,
}

impl<S> AuthService<S> {
    pub fn new(jwt: JwtService, store: S) -> Self {
        Self { jwt, store }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

impl<S: AccountDirectory> AuthService<S> {
    /// Resuelve la sesión de una petición a partir de su token.
    ///
    /// Sin token, con token inválido o expirado, o con una cuenta que ya no
    /// existe: `Unauthenticated`. Cuenta no ACTIVE: `InactiveAccount`. El
    /// contexto se arma con el rol y la sucursal almacenados, no con los del token.
    pub async fn resolve_session(&self, token: Option<&str>) -> AppResult<SessionContext> {
        let token = token.ok_or(AuthenticationError::Unauthenticated)?;

        let claims = self.jwt.validate_token(token).map_err(|e| {
            tracing::debug!("🔑 Token rechazado: {}", e);
            AuthenticationError::Unauthenticated
        })?;

        let user_id = claims.user_id().ok_or(AuthenticationError::Unauthenticated)?;
        let account = self.active_account(user_id).await?;

        Ok(account.session())
    }

    async fn active_account(&self, user_id: Uuid) -> AppResult<Account> {
        let account = self
            .store
            .find_account(user_id)
            .await?
            .ok_or(AuthenticationError::Unauthenticated)?;

        if !account.state.is_active() {
            tracing::warn!("⚠️ Cuenta {} en estado {}", account.id, account.state.name());
            return Err(AuthenticationError::InactiveAccount.into());
        }

        Ok(account)
    }
}

impl<S: AccountDirectory + CredentialVerifier> AuthService<S> {
    /// Autentica con email y contraseña y emite un token de acceso
    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginData> {
        let identity = self
            .store
            .verify_credentials(&request.email, &request.password)
            .await?
            .ok_or_else(|| {
                tracing::warn!("🔐 Credenciales inválidas para {}", request.email);
                AuthenticationError::Unauthenticated
            })?;

        let account = self.active_account(identity.user_id).await?;
        let session = account.session();
        let issued = self.jwt.generate_access_token(&session)?;

        tracing::info!("✅ Login de {} ({})", session.email(), session.role());

        Ok(LoginData {
            token: issued.token,
            expires_at: issued.expires_at,
            session,
        })
    }
}
