use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::EntityController;
use crate::dto::entity_dto::{ListQuery, ListResponse, RecordQuery};
use crate::dto::ApiResponse;
use crate::models::lifecycle::LifecycleAction;
use crate::models::module::ResourceModule;
use crate::middleware::{ApiJson, ApiPath, ApiQuery};
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::{invalid_argument, AppError};

/// Rutas CRUD y de ciclo de vida compartidas por todos los módulos
pub fn create_entity_router() -> Router<AppState> {
    Router::new()
        .route("/:module", get(list_records).post(create_record))
        .route(
            "/:module/:id",
            get(get_record).put(update_record).delete(soft_delete_record),
        )
        .route("/:module/:id/restaurar", post(restore_record))
        .route("/:module/:id/desactivar", post(deactivate_record))
        .route("/:module/:id/activar", post(reactivate_record))
        .route("/:module/:id/permanente", delete(hard_delete_record))
}

fn parse_target(module: &str, id: &str) -> Result<(ResourceModule, Uuid), AppError> {
    let module = module.parse()?;
    let id = Uuid::parse_str(id).map_err(|_| invalid_argument(format!("id inválido: '{}'", id)))?;
    Ok((module, id))
}

async fn list_records(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath(module): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<ListResponse>>, AppError> {
    let module: ResourceModule = module.parse()?;
    let controller = EntityController::new(state.pool.clone());
    let response = controller.list(&ctx, module, query).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_record(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath((module, id)): ApiPath<(String, String)>,
    ApiQuery(query): ApiQuery<RecordQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (module, id) = parse_target(&module, &id)?;
    let controller = EntityController::new(state.pool.clone());
    let record = controller.get(&ctx, module, id, query.estado.as_deref()).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn create_record(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath(module): ApiPath<String>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let module: ResourceModule = module.parse()?;
    let controller = EntityController::new(state.pool.clone());
    let response = controller.create(&ctx, module, payload).await?;
    Ok(Json(response))
}

async fn update_record(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath((module, id)): ApiPath<(String, String)>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (module, id) = parse_target(&module, &id)?;
    let controller = EntityController::new(state.pool.clone());
    let response = controller.update(&ctx, module, id, payload).await?;
    Ok(Json(response))
}

async fn soft_delete_record(
    state: State<AppState>,
    ctx: SessionContext,
    path: ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    apply_transition(state, ctx, path, LifecycleAction::SoftDelete).await
}

async fn restore_record(
    state: State<AppState>,
    ctx: SessionContext,
    path: ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    apply_transition(state, ctx, path, LifecycleAction::Restore).await
}

async fn deactivate_record(
    state: State<AppState>,
    ctx: SessionContext,
    path: ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    apply_transition(state, ctx, path, LifecycleAction::Deactivate).await
}

async fn reactivate_record(
    state: State<AppState>,
    ctx: SessionContext,
    path: ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    apply_transition(state, ctx, path, LifecycleAction::Reactivate).await
}

async fn apply_transition(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath((module, id)): ApiPath<(String, String)>,
    action: LifecycleAction,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (module, id) = parse_target(&module, &id)?;
    let controller = EntityController::new(state.pool.clone());
    let response = controller.transition(&ctx, module, id, action).await?;
    Ok(Json(response))
}

async fn hard_delete_record(
    State(state): State<AppState>,
    ctx: SessionContext,
    ApiPath((module, id)): ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let (module, id) = parse_target(&module, &id)?;
    let controller = EntityController::new(state.pool.clone());
    let response = controller.hard_delete(&ctx, module, id).await?;
    Ok(Json(response))
}
