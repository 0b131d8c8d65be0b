//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee requests completos respetando el límite de body
//! 4. Despacha a estáticos o al router y envía la respuesta

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::Server;
