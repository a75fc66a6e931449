//! Extractores con rechazo propio
//!
//! Envuelven `Json`, `Query` y `Path` de axum para que un cuerpo mal formado,
//! una query inválida o un segmento de ruta ilegible respondan con la misma
//! envoltura `{ success: false, error, code }` que el resto de errores.

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
