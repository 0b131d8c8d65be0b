//! # Métricas de Usabilidad
//! src/metrics/mod.rs
//!
//! Bitácora CSV append-only con una fila por resultado de request
//! (alta, edición y borrado de tareas).

pub mod logger;

pub use logger::{LogEntry, MetricsLogger, Step, TaskCode, CSV_HEADER};
