//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que usa la aplicación de tareas. Según el RFC 1945,
//! HTTP/1.0 agrupa los códigos en 5 categorías:
//!
//! - **2xx**: Éxito (200 OK)
//! - **3xx**: Redirección (302 tras un POST exitoso, 304 para estáticos en caché)
//! - **4xx**: Error del cliente (400, 404, 405, 413)
//! - **5xx**: Error del servidor (500)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 302 Found - Redirección después de crear, editar o borrar una tarea
    Found = 302,

    /// 304 Not Modified - El cliente ya tiene la versión actual del archivo
    NotModified = 304,

    /// 400 Bad Request - Título inválido o request malformado
    BadRequest = 400,

    /// 404 Not Found - Ruta o tarea no encontrada
    NotFound = 404,

    /// 405 Method Not Allowed - La ruta existe pero no con ese método
    MethodNotAllowed = 405,

    /// 413 Payload Too Large - Body más grande que el límite configurado
    PayloadTooLarge = 413,

    /// 500 Internal Server Error - Falla de I/O en la bitácora o en templates
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use tasks_server::http::StatusCode;
    /// assert_eq!(StatusCode::Found.as_u16(), 302);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "302 Found"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
