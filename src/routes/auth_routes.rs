use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::{login, me};
use crate::state::AppState;

/// Configura las rutas de autenticación
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
