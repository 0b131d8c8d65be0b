//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Implementa el protocolo HTTP/1.0 desde cero, sin librerías de alto
//! nivel. Incluye:
//!
//! - Parsing de requests (headers, cookies, formularios urlencoded)
//! - Construcción de responses (HTML, texto, redirecciones)
//! - Manejo de status codes
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html; charset=utf-8\r\n
//! Content-Length: 12\r\n
//! \r\n
//! <p>hello</p>
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Permite usar `http::Request` en vez de `http::request::Request`
pub use request::{find_header_end, Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
