pub mod auth_controller;
pub mod entity_controller;

pub use entity_controller::EntityController;
