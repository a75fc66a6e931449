//! Objetos de transferencia de la API HTTP

pub mod api_response;
pub mod auth_dto;
pub mod entity_dto;

pub use api_response::ApiResponse;
