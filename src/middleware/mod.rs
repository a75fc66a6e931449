//! Middleware del sistema
//!
//! Este módulo contiene la resolución de sesiones por petición y la
//! configuración de CORS, además de los extractores que comparten la
//! envoltura de errores.

pub mod cors;
pub mod extract;
pub mod session;

pub use cors::*;
pub use extract::{ApiJson, ApiPath, ApiQuery};
