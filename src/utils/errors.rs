//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del sistema (autenticación,
//! autorización, argumentos inválidos, ciclo de vida y almacén) y su
//! conversión a la envoltura JSON `{ success, error, code }` que ven los clientes.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Fallos al resolver la identidad de quien llama
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("No autenticado: token ausente, inválido o expirado")]
    Unauthenticated,

    #[error("La cuenta no está activa")]
    InactiveAccount,
}

/// Fallos de permisos sobre un módulo o registro
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("El rol {role} no puede {action} en {module}")]
    Forbidden {
        role: String,
        action: &'static str,
        module: &'static str,
    },

    #[error("El registro pertenece a otra sucursal")]
    BranchMismatch,

    #[error("La sesión no tiene sucursal asignada")]
    MissingBranchContext,
}

/// Transiciones de ciclo de vida no permitidas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Transición inválida: no se puede {action} un registro {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// Errores de configuración al arrancar
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Variable de entorno requerida ausente: {0}")]
    Missing(&'static str),

    #[error("Valor inválido para {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl AppError {
    /// Código estable y estado HTTP asociados a cada variante
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Authentication(AuthenticationError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
            }
            AppError::Authentication(AuthenticationError::InactiveAccount) => {
                (StatusCode::UNAUTHORIZED, "INACTIVE_ACCOUNT")
            }
            AppError::Authorization(AuthorizationError::MissingBranchContext) => {
                (StatusCode::FORBIDDEN, "MISSING_BRANCH_CONTEXT")
            }
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Lifecycle(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
            AppError::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Hash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HASH_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Mensaje visible para el cliente; los fallos internos no filtran detalles
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Ocurrió un error al acceder a la base de datos".to_string(),
            AppError::Jwt(_) => "Ocurrió un error al emitir la sesión".to_string(),
            AppError::Hash(_) => "Ocurrió un error al procesar las credenciales".to_string(),
            AppError::Internal(_) => "Ocurrió un error inesperado".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("❌ {}: {}", code, self);
        } else {
            tracing::warn!("⚠️ {}: {}", code, self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
            code,
        };

        (status, Json(body)).into_response()
    }
}

// Los rechazos de los extractores de axum salen con la misma envoltura
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidArgument(format!("Cuerpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidArgument(format!("Parámetros de consulta inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidArgument(format!("Ruta inválida: {}", rejection.body_text()))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}

/// Función helper para crear errores de argumento inválido
pub fn invalid_argument(message: impl Into<String>) -> AppError {
    AppError::InvalidArgument(message.into())
}
