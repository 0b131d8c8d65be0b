//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP/1.0 escrito desde cero. Acepta también request lines
//! `HTTP/1.1` porque los navegadores las envían por defecto.
//!
//! ## Formato de un Request con formulario
//!
//! ```text
//! POST /tasks HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Cookie: sid=P_042\r\n
//! Content-Type: application/x-www-form-urlencoded\r\n
//! Content-Length: 18\r\n
//! \r\n
//! title=Write+report
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.0`
//! 2. **Headers**: Pares `Name: Value` (nombres sin distinguir mayúsculas)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: bytes crudos; si es un formulario se decodifica en campos

use std::collections::HashMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,

    /// POST - Enviar un formulario
    POST,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es soportado
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
        }
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, HEAD, POST)
    method: Method,

    /// Path de la petición sin query (ej: "/tasks/abc/edit")
    path: String,

    /// Headers HTTP, con el nombre normalizado a minúsculas
    headers: HashMap<String, String>,

    /// Cookies del header `Cookie`
    cookies: HashMap<String, String>,

    /// Campos de formulario decodificados del body
    form: HashMap<String, String>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Busca el fin de los headers (`\r\n\r\n`) y retorna la posición donde empieza el body
pub fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use tasks_server::http::Request;
    ///
    /// let raw = b"POST /tasks HTTP/1.0\r\nContent-Length: 14\r\n\r\ntitle=Buy+milk";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/tasks");
    /// assert_eq!(request.form_field("title"), Some("Buy milk"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Sin separador se toma todo como cabecera (request sin body)
        let (head_bytes, body) = match find_header_end(buffer) {
            Some(body_start) => buffer.split_at(body_start),
            None => (buffer, &[][..]),
        };

        let head = std::str::from_utf8(head_bytes).map_err(|_| ParseError::InvalidRequestLine)?;

        if head.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let lines: Vec<&str> = head.split("\r\n").collect();

        // 1. Request line
        let (method, path) = Self::parse_request_line(lines[0])?;

        // 2. Headers
        let headers = Self::parse_headers(&lines[1..])?;

        // 3. Cookies y formulario
        let cookies = headers
            .get("cookie")
            .map(|raw| parse_cookies(raw))
            .unwrap_or_default();

        let is_form = headers
            .get("content-type")
            .map_or(true, |ct| ct.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE));
        let form = if is_form && !body.is_empty() {
            parse_urlencoded(&String::from_utf8_lossy(body))
        } else {
            HashMap::new()
        };

        Ok(Request {
            method,
            path,
            headers,
            cookies,
            form,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`. La query se descarta: ninguna
    /// ruta la usa.
    fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        let path = match parts[1].split_once('?') {
            Some((path, _query)) => path,
            None => parts[1],
        };

        let version = parts[2];
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((method, path.to_string()))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene un header sin distinguir mayúsculas
    ///
    /// # Ejemplo
    /// ```
    /// use tasks_server::http::Request;
    ///
    /// let raw = b"GET /tasks HTTP/1.0\r\nHX-Request: true\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.header("hx-request"), Some("true"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Obtiene una cookie por nombre
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|s| s.as_str())
    }

    /// Obtiene un campo del formulario enviado en el body
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(|s| s.as_str())
    }
}

/// Parsea el header `Cookie` ("a=1; sid=P_042") en un mapa
fn parse_cookies(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

/// Parsea pares `key=value&...` de un body de formulario
///
/// Ejemplo: "title=Buy+milk&x" → {"title": "Buy milk", "x": ""}
fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in input.split('&') {
        if pair.is_empty() {
            continue;
        }

        match pair.split_once('=') {
            Some((key, value)) => params.insert(url_decode(key), url_decode(value)),
            None => params.insert(url_decode(pair), String::new()),
        };
    }

    params
}

/// Decodifica `+` como espacio y secuencias `%XX` como bytes
///
/// Las secuencias inválidas se dejan tal cual; el UTF-8 inválido se
/// reemplaza por U+FFFD.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high << 4 | low);
                        i += 2;
                    }
                    _ => decoded.push(b'%'),
                }
            }
            byte => decoded.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
