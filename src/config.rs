//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de tareas con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./tasks_server --port 8080 \
//!   --metrics-file data/metrics.csv \
//!   --static-dir static \
//!   --validate-edits
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 METRICS_FILE=/tmp/m.csv ./tasks_server
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Configuración del servidor de tareas
#[derive(Debug, Clone, Parser)]
#[command(name = "tasks_server")]
#[command(about = "Lista de tareas mínima con bitácora CSV de usabilidad")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Archivo CSV de la bitácora de métricas
    #[arg(long = "metrics-file", default_value = "data/metrics.csv", env = "METRICS_FILE")]
    pub metrics_file: PathBuf,

    /// Directorio servido bajo /static/
    #[arg(long = "static-dir", default_value = "static", env = "STATIC_DIR")]
    pub static_dir: PathBuf,

    // === Límites ===

    /// Tamaño máximo del body de un request en bytes
    #[arg(long = "max-body-bytes", default_value = "65536", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "10000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Comportamiento ===

    /// Valida también el título al editar una tarea
    #[arg(long = "validate-edits", env = "VALIDATE_EDITS")]
    pub validate_edits: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// # Ejemplo
    /// ```no_run
    /// use tasks_server::config::Config;
    ///
    /// let config = Config::new();
    /// println!("Server listening on {}", config.address());
    /// ```
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use tasks_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.metrics_file.as_os_str().is_empty() {
            return Err("Metrics file path must not be empty".to_string());
        }
        if self.metrics_file.is_dir() {
            return Err(format!(
                "Metrics file {} is a directory",
                self.metrics_file.display()
            ));
        }
        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            metrics_file = %self.metrics_file.display(),
            static_dir = %self.static_dir.display(),
            max_body_bytes = self.max_body_bytes,
            read_timeout_ms = self.read_timeout_ms,
            validate_edits = self.validate_edits,
            "configuration loaded"
        );

        if !self.static_dir.is_dir() {
            tracing::warn!(
                static_dir = %self.static_dir.display(),
                "static directory not found, /static/ will answer 404"
            );
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            metrics_file: PathBuf::from("data/metrics.csv"),
            static_dir: PathBuf::from("static"),
            max_body_bytes: 65_536,
            read_timeout_ms: 10_000,
            validate_edits: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.metrics_file, PathBuf::from("data/metrics.csv"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(!config.validate_edits);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = "  ".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("Host"));
    }

    #[test]
    fn test_validate_metrics_file_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.metrics_file = dir.path().to_path_buf();
        let result = config.validate();
        assert!(result.unwrap_err().contains("is a directory"));
    }

    #[test]
    fn test_validate_invalid_max_body() {
        let mut config = Config::default();
        config.max_body_bytes = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Max body"));
    }

    #[test]
    fn test_validate_invalid_read_timeout() {
        let mut config = Config::default();
        config.read_timeout_ms = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Read timeout"));
    }

    // ==================== CLI Parsing ====================

    #[test]
    fn test_parse_cli_flags() {
        let config = Config::try_parse_from([
            "tasks_server",
            "--port",
            "9090",
            "--metrics-file",
            "/tmp/metrics.csv",
            "--validate-edits",
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.metrics_file, PathBuf::from("/tmp/metrics.csv"));
        assert!(config.validate_edits);
    }

    #[test]
    fn test_parse_rejects_invalid_port() {
        assert!(Config::try_parse_from(["tasks_server", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_read_timeout_duration() {
        let mut config = Config::default();
        config.read_timeout_ms = 1500;
        assert_eq!(config.read_timeout(), Duration::from_millis(1500));
    }
}
