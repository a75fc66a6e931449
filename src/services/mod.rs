//! Services module
//!
//! Este módulo contiene la lógica de negocio: autenticación, emisión y
//! validación de tokens y los predicados de autorización.

pub mod auth_service;
pub mod authorization_service;
pub mod jwt_service;

pub use auth_service::{AccountDirectory, AuthService, CredentialVerifier};
pub use authorization_service::{AccessLevel, AuthorizationService, ModulePermissions};
pub use jwt_service::JwtService;
