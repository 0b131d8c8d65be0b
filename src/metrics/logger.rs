//! # Bitácora CSV de Métricas
//! src/metrics/logger.rs
//!
//! Agrega una fila CSV por cada resultado instrumentado (alta, edición,
//! borrado de tareas). El archivo es compartido por todos los threads;
//! un `Mutex` garantiza que una sola escritura toca el archivo a la vez,
//! así ninguna fila queda partida o mezclada con otra.
//!
//! ## Formato
//!
//! ```text
//! ts_iso,session_id,request_id,task_code,step,outcome,ms,http_status,js_mode
//! 2026-10-17T18:40:12.123Z,P_anon,1a2b3c4d,T1_add,success,,3,200,off
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Fila de cabecera del archivo CSV
pub const CSV_HEADER: &str =
    "ts_iso,session_id,request_id,task_code,step,outcome,ms,http_status,js_mode\n";

/// Operación de usuario a la que corresponde una fila
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCode {
    Add,
    Edit,
    Delete,
}

impl TaskCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCode::Add => "T1_add",
            TaskCode::Edit => "T2_edit",
            TaskCode::Delete => "T3_delete",
        }
    }
}

/// Etapa en la que terminó el request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ValidationError,
    Success,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ValidationError => "validation_error",
            Step::Success => "success",
        }
    }
}

/// Una fila de la bitácora; se serializa y se descarta de inmediato
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub session_id: String,
    pub request_id: String,
    pub task_code: TaskCode,
    pub step: Step,
    pub outcome: String,
    pub duration_ms: u64,
    pub status_code: u16,
    pub js_mode: String,
}

impl LogEntry {
    /// Formatea la fila CSV de 9 columnas (con salto de línea final)
    pub fn to_csv_row(&self, timestamp: DateTime<Utc>) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}\n",
            timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            csv_field(&self.session_id),
            csv_field(&self.request_id),
            self.task_code.as_str(),
            self.step.as_str(),
            csv_field(&self.outcome),
            self.duration_ms,
            self.status_code,
            csv_field(&self.js_mode),
        )
    }
}

/// Entrecomilla un campo si contiene separadores (RFC 4180)
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Escritor de la bitácora, compartido entre threads
#[derive(Debug)]
pub struct MetricsLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl MetricsLogger {
    /// Abre (o crea) el archivo CSV y su directorio padre
    ///
    /// Si el archivo está vacío se escribe la fila de cabecera.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if file.metadata()?.len() == 0 {
            file.write_all(CSV_HEADER.as_bytes())?;
            file.flush()?;
        }

        tracing::debug!(path = %path.display(), "metrics log opened");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Bitácora sobre un archivo ya abierto, sin escribir cabecera
    #[cfg(test)]
    pub(crate) fn from_file(path: impl Into<PathBuf>, file: File) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(file),
        }
    }

    /// Ruta del archivo CSV
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Agrega una fila; un solo writer toca el archivo a la vez
    pub fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let mut file = self.file.lock();

        // Timestamp tomado bajo el lock: las filas quedan en orden temporal
        let row = entry.to_csv_row(Utc::now());
        file.write_all(row.as_bytes())?;
        file.flush()
    }

    /// Fila de error de validación (status 400, duración 0)
    pub fn validation_error(
        &self,
        session_id: &str,
        request_id: &str,
        task_code: TaskCode,
        outcome: &str,
        js_mode: &str,
    ) -> io::Result<()> {
        self.write(&LogEntry {
            session_id: session_id.to_string(),
            request_id: request_id.to_string(),
            task_code,
            step: Step::ValidationError,
            outcome: outcome.to_string(),
            duration_ms: 0,
            status_code: 400,
            js_mode: js_mode.to_string(),
        })
    }

    /// Fila de éxito (status 200, outcome vacío)
    pub fn success(
        &self,
        session_id: &str,
        request_id: &str,
        task_code: TaskCode,
        duration_ms: u64,
        js_mode: &str,
    ) -> io::Result<()> {
        self.write(&LogEntry {
            session_id: session_id.to_string(),
            request_id: request_id.to_string(),
            task_code,
            step: Step::Success,
            outcome: String::new(),
            duration_ms,
            status_code: 200,
            js_mode: js_mode.to_string(),
        })
    }
}
