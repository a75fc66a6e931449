use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::auth_dto::{LoginData, LoginRequest, SessionData};
use crate::dto::ApiResponse;
use crate::middleware::ApiJson;
use crate::models::session::SessionContext;
use crate::services::AuthorizationService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Endpoint de login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    payload.validate()?;

    let data = state.auth.login(&payload).await?;

    Ok(Json(ApiResponse::success_with_message(data, "Login exitoso")))
}

/// Sesión actual con el resumen de permisos por módulo
pub async fn me(ctx: SessionContext) -> Json<ApiResponse<SessionData>> {
    let data = SessionData {
        access_level: AuthorizationService::access_level(&ctx),
        permissions: AuthorizationService::permissions_for(&ctx),
        session: ctx,
    };

    Json(ApiResponse::success(data))
}
