//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::UserRepository;
use crate::services::{AuthService, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub auth: Arc<AuthService<UserRepository>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let auth = AuthService::new(JwtService::from_config(&config), UserRepository::new(pool.clone()));

        Self {
            pool,
            config,
            auth: Arc::new(auth),
        }
    }
}
