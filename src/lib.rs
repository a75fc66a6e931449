//! Capa de acceso a datos multi-sucursal para la plataforma de envíos
//!
//! Autenticación por JWT, autorización por rol y sucursal, ciclo de vida con
//! borrado lógico y una API CRUD genérica sobre los módulos del negocio.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod query;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
