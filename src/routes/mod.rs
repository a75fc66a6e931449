//! Router HTTP
//!
//! `/health` es público; `/auth/me` y todo `/api` exigen una sesión válida,
//! que se resuelve por petición con el extractor de `SessionContext`.

pub mod auth_routes;
pub mod entity_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes::auth_routes())
        .nest("/api", entity_routes::create_entity_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check
async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }
    }))
}
