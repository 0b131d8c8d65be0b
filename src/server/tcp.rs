//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread: se lee un request completo
//! (headers + `Content-Length` bytes de body), se despacha y se cierra.

use crate::assets::StaticFiles;
use crate::config::Config;
use crate::error::ServerError;
use crate::http::{find_header_end, Method, Request, Response, StatusCode};
use crate::metrics::MetricsLogger;
use crate::render::Renderer;
use crate::router::Router;
use crate::state::AppState;
use crate::tasks::handlers;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Tamaño máximo de la sección de headers
const MAX_HEAD_BYTES: usize = 16 * 1024;

const READ_CHUNK: usize = 4096;

/// Resultado de leer un request del socket
#[derive(Debug, PartialEq, Eq)]
enum ReadOutcome {
    /// El peer cerró sin enviar nada
    Closed,
    /// Bytes crudos del request (headers + body)
    Complete(Vec<u8>),
    /// Headers o body por encima del límite
    TooLarge,
    /// `Content-Length` no numérico
    InvalidLength,
    /// EOF antes de recibir `Content-Length` bytes de body
    Incomplete,
}

/// Servidor HTTP/1.0 de la lista de tareas
pub struct Server {
    config: Config,
    router: Arc<Router>,
    state: Arc<AppState>,
    listener: Option<TcpListener>,
}

impl Server {
    /// Construye store, bitácora, renderer y router
    ///
    /// Falla si la configuración es inválida, si la bitácora no se puede
    /// abrir o si algún template no compila.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let logger = MetricsLogger::open(&config.metrics_file)?;
        let renderer = Renderer::new()?;
        let static_files = StaticFiles::new(config.static_dir.clone());
        let state = AppState::new(logger, renderer, static_files)
            .with_validate_edits(config.validate_edits);

        let mut router = Router::new();
        handlers::register(&mut router)?;

        for route in router.routes() {
            tracing::debug!(route = %route, "route registered");
        }

        Ok(Self {
            config,
            router: Arc::new(router),
            state: Arc::new(state),
            listener: None,
        })
    }

    /// Estado compartido por los handlers
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Abre el socket y retorna la dirección efectiva (útil con puerto 0)
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.address())?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// Acepta conexiones indefinidamente, un thread por conexión
    pub fn run(&mut self) -> io::Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind(self.config.address())?,
        };

        tracing::info!(
            address = %listener.local_addr()?,
            metrics_file = %self.state.logger.path().display(),
            "server listening (one thread per connection)"
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let state = Arc::clone(&self.state);
                    let max_body_bytes = self.config.max_body_bytes;

                    if let Err(e) = stream.set_read_timeout(Some(self.config.read_timeout())) {
                        tracing::warn!(error = %e, "failed to set read timeout");
                    }

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router, &state, max_body_bytes) {
                            tracing::warn!(error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        mut stream: TcpStream,
        router: &Router,
        state: &AppState,
        max_body_bytes: usize,
    ) -> io::Result<()> {
        let start = Instant::now();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let raw = match read_request(&mut stream, max_body_bytes)? {
            ReadOutcome::Closed => {
                tracing::debug!(peer = %peer, "connection closed without request");
                return Ok(());
            }
            ReadOutcome::Complete(raw) => raw,
            ReadOutcome::TooLarge => {
                let response = Router::with_common_headers(Response::error(
                    StatusCode::PayloadTooLarge,
                    "Request too large",
                ));
                return write_response(&mut stream, &response, false);
            }
            ReadOutcome::InvalidLength => {
                let response = Router::with_common_headers(Response::error(
                    StatusCode::BadRequest,
                    "Invalid: bad Content-Length",
                ));
                return write_response(&mut stream, &response, false);
            }
            ReadOutcome::Incomplete => {
                tracing::warn!(peer = %peer, "body shorter than Content-Length");
                let response = Router::with_common_headers(Response::error(
                    StatusCode::BadRequest,
                    "Invalid: body shorter than Content-Length",
                ));
                return write_response(&mut stream, &response, false);
            }
        };

        let (response, method, path) = match Request::parse(&raw) {
            Ok(request) => {
                let response = dispatch(router, state, &request);
                (response, request.method(), request.path().to_string())
            }
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "malformed request");
                let response = Router::with_common_headers(Response::error(
                    StatusCode::BadRequest,
                    &format!("Invalid: {}", e),
                ));
                write_response(&mut stream, &response, false)?;
                return Ok(());
            }
        };

        write_response(&mut stream, &response, method == Method::HEAD)?;

        tracing::info!(
            method = method.as_str(),
            path = %path,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request served"
        );

        Ok(())
    }
}

/// Estáticos bajo `/static/`, el resto al router
fn dispatch(router: &Router, state: &AppState, request: &Request) -> Response {
    if StaticFiles::handles(request.path()) {
        Router::with_common_headers(state.static_files.serve(request))
    } else {
        router.route(request, state)
    }
}

fn write_response<W: Write>(writer: &mut W, response: &Response, head_only: bool) -> io::Result<()> {
    let bytes = if head_only {
        response.head_bytes()
    } else {
        response.to_bytes()
    };
    writer.write_all(&bytes)?;
    writer.flush()
}

/// Lee headers y luego exactamente `Content-Length` bytes de body
fn read_request<R: Read>(reader: &mut R, max_body_bytes: usize) -> io::Result<ReadOutcome> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    let head_end = loop {
        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_HEAD_BYTES {
            return Ok(ReadOutcome::TooLarge);
        }

        let n = reader.read(&mut chunk)?;
        if n == 0 {
            // EOF antes del fin de headers: el parser decide
            return Ok(if buffer.is_empty() {
                ReadOutcome::Closed
            } else {
                ReadOutcome::Complete(buffer)
            });
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let content_length = match content_length(&buffer[..head_end]) {
        Ok(length) => length,
        Err(()) => return Ok(ReadOutcome::InvalidLength),
    };
    if content_length > max_body_bytes {
        return Ok(ReadOutcome::TooLarge);
    }

    let total = head_end + content_length;
    while buffer.len() < total {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok(ReadOutcome::Incomplete);
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    buffer.truncate(total);

    Ok(ReadOutcome::Complete(buffer))
}

/// Valor de `Content-Length` en la sección de headers (0 si no está)
fn content_length(head: &[u8]) -> Result<usize, ()> {
    let head = String::from_utf8_lossy(head);

    for line in head.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().map_err(|_| ());
            }
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_request_with_body() {
        let raw = b"POST /tasks HTTP/1.0\r\nContent-Length: 11\r\n\r\ntitle=Milk!trailing";
        let outcome = read_request(&mut Cursor::new(&raw[..]), 1024).unwrap();

        let expected = b"POST /tasks HTTP/1.0\r\nContent-Length: 11\r\n\r\ntitle=Milk!".to_vec();
        assert_eq!(outcome, ReadOutcome::Complete(expected));
    }

    #[test]
    fn test_read_request_without_body() {
        let raw = b"GET /tasks HTTP/1.0\r\n\r\n";
        let outcome = read_request(&mut Cursor::new(&raw[..]), 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::Complete(raw.to_vec()));
    }

    #[test]
    fn test_read_request_closed() {
        let outcome = read_request(&mut Cursor::new(&b""[..]), 1024).unwrap();
        assert_eq!(outcome, ReadOutcome::Closed);
    }

    #[test]
    fn test_read_request_body_too_large() {
        let raw = b"POST /tasks HTTP/1.0\r\nContent-Length: 5000\r\n\r\n";
        let outcome = read_request(&mut Cursor::new(&raw[..]), 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::TooLarge);
    }

    #[test]
    fn test_read_request_head_too_large() {
        let mut raw = b"GET /tasks HTTP/1.0\r\nX-Filler: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_HEAD_BYTES + READ_CHUNK));
        let outcome = read_request(&mut Cursor::new(raw), 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::TooLarge);
    }

    #[test]
    fn test_read_request_short_body() {
        let raw = b"POST /tasks HTTP/1.0\r\nContent-Length: 30\r\n\r\ntitle=Buy";
        let outcome = read_request(&mut Cursor::new(&raw[..]), 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::Incomplete);
    }

    #[test]
    fn test_read_request_invalid_length() {
        let raw = b"POST /tasks HTTP/1.0\r\nContent-Length: lots\r\n\r\n";
        let outcome = read_request(&mut Cursor::new(&raw[..]), 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::InvalidLength);
    }

    #[test]
    fn test_content_length_case_insensitive() {
        assert_eq!(content_length(b"POST / HTTP/1.0\r\ncontent-LENGTH:  42\r\n\r\n"), Ok(42));
        assert_eq!(content_length(b"GET / HTTP/1.0\r\n\r\n"), Ok(0));
    }

    #[test]
    fn test_write_response_head_only() {
        let response = Response::html("<p>hi</p>");
        let mut out = Vec::new();

        write_response(&mut out, &response, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 9"));
        assert!(text.ends_with("\r\n\r\n"));
    }
}
