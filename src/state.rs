//! # Estado Compartido
//! src/state.rs
//!
//! Todo lo que los handlers necesitan, construido una sola vez al arrancar
//! y compartido por todos los threads detrás de un `Arc`.

use crate::assets::StaticFiles;
use crate::metrics::MetricsLogger;
use crate::render::Renderer;
use crate::tasks::TaskStore;

#[derive(Debug)]
pub struct AppState {
    /// Única instancia del store durante la vida del proceso
    pub store: TaskStore,

    pub logger: MetricsLogger,

    pub renderer: Renderer,

    pub static_files: StaticFiles,

    /// Aplica la regla del título también al editar
    pub validate_edits: bool,
}

impl AppState {
    pub fn new(logger: MetricsLogger, renderer: Renderer, static_files: StaticFiles) -> Self {
        Self {
            store: TaskStore::new(),
            logger,
            renderer,
            static_files,
            validate_edits: false,
        }
    }

    pub fn with_validate_edits(mut self, enabled: bool) -> Self {
        self.validate_edits = enabled;
        self
    }
}
