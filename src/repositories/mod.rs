//! Repositorios: el único código que habla SQL

pub mod audit_repository;
pub mod entity_repository;
pub mod user_repository;

pub use audit_repository::{AuditEntry, AuditRepository};
pub use entity_repository::{EntityRepository, LockedRecord};
pub use user_repository::UserRepository;
