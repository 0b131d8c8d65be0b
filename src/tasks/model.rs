//! # Modelo de Tarea
//! src/tasks/model.rs
//!
//! Define la entidad `Task` y la regla de validación del título.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Largo mínimo del título, en caracteres, después de `trim`
pub const MIN_TITLE_CHARS: usize = 3;

/// Una tarea de la lista
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Identificador UUID v4, generado al crear la tarea
    pub id: String,

    /// Único campo editable por el usuario
    pub title: String,

    /// Ninguna ruta lo modifica todavía; se renderiza tal cual
    pub completed: bool,

    /// Momento de creación (UTC)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Crea una tarea nueva con id aleatorio y `completed = false`
    ///
    /// # Ejemplo
    /// ```
    /// use tasks_server::tasks::Task;
    ///
    /// let task = Task::new("Buy milk");
    /// assert_eq!(task.title, "Buy milk");
    /// assert!(!task.completed);
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Copia de la tarea con otro título; conserva id, completed y created_at
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Motivo por el que un título no es válido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    Blank,

    #[error("Title must be at least 3 characters.")]
    TooShort,
}

impl ValidationError {
    /// Valor de la columna `outcome` en la bitácora CSV
    pub fn outcome(&self) -> &'static str {
        "invalid_title"
    }
}

/// Valida un título: no vacío y al menos 3 caracteres después de `trim`
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Blank);
    }
    if trimmed.chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TooShort);
    }

    Ok(())
}
