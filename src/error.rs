//! # Errores de la Aplicación
//! src/error.rs
//!
//! - `AppError`: fallas dentro de un handler; el router las convierte en 500
//! - `ServerError`: fallas al arrancar (configuración, bitácora, templates)

use crate::render::RenderError;
use crate::tasks::StoreError;
use std::io;
use thiserror::Error;

/// Error de un handler de request
#[derive(Debug, Error)]
pub enum AppError {
    /// La bitácora CSV no se pudo escribir; no hay sink alternativo
    #[error("metrics log write failed: {0}")]
    MetricsLog(#[from] io::Error),

    #[error("template rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error fatal de arranque
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("template setup failed: {0}")]
    Templates(#[from] RenderError),

    #[error("invalid route pattern: {0}")]
    Route(#[from] regex::Error),
}
