//! # Tareas
//! src/tasks/mod.rs
//!
//! Modelo, almacenamiento en memoria y handlers HTTP de la lista de tareas.

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{validate_title, Task, ValidationError, MIN_TITLE_CHARS};
pub use store::{StoreError, TaskStore};
