//! # Tasks Server
//! src/lib.rs
//!
//! Lista de tareas mínima servida sobre HTTP/1.0, pensada para estudios de
//! usabilidad: cada alta, edición y borrado deja una fila en una bitácora
//! CSV append-only.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento por método y patrón de path
//! - `tasks`: Modelo, validación, store en memoria y handlers
//! - `metrics`: Bitácora CSV de usabilidad
//! - `render`: Templates HTML con auto-escape
//! - `assets`: Archivos estáticos bajo `/static/`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use tasks_server::config::Config;
//! use tasks_server::server::Server;
//!
//! let mut server = Server::new(Config::default()).expect("startup");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod render;
pub mod router;
pub mod server;
pub mod state;
pub mod tasks;
