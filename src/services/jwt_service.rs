use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::session::SessionContext;
use crate::utils::errors::AppError;

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub sucursal_id: Option<String>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl JwtClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Token emitido junto con su vencimiento
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Servicio JWT
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    access_token_duration: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, access_token_seconds: i64) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::seconds(access_token_seconds),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration)
    }

    /// Genera un token de acceso para la sesión
    pub fn generate_access_token(&self, ctx: &SessionContext) -> Result<IssuedToken, AppError> {
        self.generate_access_token_at(ctx, Utc::now())
    }

    /// Igual que `generate_access_token` pero con un instante de emisión explícito
    pub fn generate_access_token_at(
        &self,
        ctx: &SessionContext,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = issued_at + self.access_token_duration;

        let claims = JwtClaims {
            sub: ctx.user_id().to_string(),
            email: ctx.email().to_string(),
            role: ctx.role().as_str().to_string(),
            sucursal_id: ctx.branch_id().map(|id| id.to_string()),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Valida firma y vencimiento, y decodifica el token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &self.algorithm)
            .field("access_token_duration", &self.access_token_duration)
            .finish_non_exhaustive()
    }
}

/// Extraer token del header Authorization
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::UserRole;

    fn session() -> SessionContext {
        SessionContext::new(Uuid::new_v4(), "admin@logistica.pe", UserRole::AdminSucursal, Some(Uuid::new_v4()))
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = JwtService::new("secreto-de-prueba", 3600);
        let ctx = session();

        let issued = jwt_service.generate_access_token(&ctx).unwrap();
        assert!(!issued.token.is_empty());

        let claims = jwt_service.validate_token(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(ctx.user_id()));
        assert_eq!(claims.role, "ADMIN_SUCURSAL");
        assert_eq!(claims.sucursal_id, ctx.branch_id().map(|id| id.to_string()));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_service = JwtService::new("secreto-de-prueba", 60);
        let issued = jwt_service
            .generate_access_token_at(&session(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(jwt_service.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issued = JwtService::new("uno", 3600).generate_access_token(&session()).unwrap();
        assert!(JwtService::new("otro", 3600).validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
