//! Extractor de sesión
//!
//! Resuelve el `SessionContext` de cada petición a partir del header
//! `Authorization: Bearer <token>`. Los handlers que lo piden quedan protegidos;
//! cualquier fallo corta la petición con la envoltura de error estándar.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::models::session::SessionContext;
use crate::services::jwt_service::extract_bearer_token;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token);

        let ctx = state.auth.resolve_session(token).await?;
        tracing::debug!("🔐 Sesión {} ({}) en {}", ctx.user_id(), ctx.role(), parts.uri.path());

        Ok(ctx)
    }
}
