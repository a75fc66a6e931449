//! Modelos del sistema
//!
//! Este módulo contiene los tipos de dominio: roles, sesión, ciclo de vida de
//! los registros, módulos de recursos y la fila de usuarios.

pub mod lifecycle;
pub mod module;
pub mod role;
pub mod session;
pub mod user;

pub use lifecycle::{LifecycleAction, LifecycleState, Transition};
pub use module::{BranchShape, RecordBranches, ResourceModule};
pub use role::UserRole;
pub use session::{Identity, SessionContext};
