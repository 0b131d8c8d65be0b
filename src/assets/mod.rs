//! # Archivos Estáticos
//! src/assets/mod.rs
//!
//! Sirve los archivos del directorio estático bajo el prefijo `/static/`.
//!
//! - Rechaza paths con `..`, `\` o componentes absolutos (404)
//! - `ETag` fuerte con el SHA256 del contenido; `If-None-Match` → 304
//! - Comprime con gzip el contenido de texto si el cliente lo acepta

use crate::http::{Method, Request, Response, StatusCode};
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Prefijo de URL de los archivos estáticos
pub const STATIC_PREFIX: &str = "/static/";

/// Servidor de archivos estáticos desde un directorio fijo
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Indica si el path pertenece a los estáticos
    pub fn handles(path: &str) -> bool {
        path.starts_with(STATIC_PREFIX)
    }

    /// Atiende un request bajo `/static/`
    pub fn serve(&self, request: &Request) -> Response {
        if !matches!(request.method(), Method::GET | Method::HEAD) {
            return Response::empty(StatusCode::MethodNotAllowed).with_header("Allow", "GET, HEAD");
        }

        let relative = match request.path().strip_prefix(STATIC_PREFIX) {
            Some(relative) if is_safe_relative(relative) => relative,
            _ => return Response::empty(StatusCode::NotFound),
        };

        let full_path = self.root.join(relative);
        let content = match fs::read(&full_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Response::empty(StatusCode::NotFound);
            }
            Err(_) if full_path.is_dir() => return Response::empty(StatusCode::NotFound),
            Err(e) => {
                tracing::error!(path = %full_path.display(), error = %e, "failed to read static file");
                return Response::empty(StatusCode::InternalServerError);
            }
        };

        let etag = format!("\"{:x}\"", Sha256::digest(&content));
        if etag_matches(request.header("if-none-match"), &etag) {
            return Response::empty(StatusCode::NotModified).with_header("ETag", &etag);
        }

        let content_type = content_type_for(&full_path);
        let mut response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", content_type)
            .with_header("ETag", &etag)
            .with_header("Cache-Control", "no-cache");

        if is_compressible(content_type) {
            response.add_header("Vary", "Accept-Encoding");

            if accepts_gzip(request.header("accept-encoding")) {
                match gzip(&content) {
                    Ok(compressed) => {
                        return response
                            .with_header("Content-Encoding", "gzip")
                            .with_body_bytes(compressed);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "gzip failed, sending identity body");
                    }
                }
            }
        }

        response.with_body_bytes(content)
    }
}

/// Solo componentes normales: nada de `..`, raíz ni prefijos de unidad
fn is_safe_relative(relative: &str) -> bool {
    !relative.is_empty()
        && !relative.contains('\\')
        && Path::new(relative)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    match if_none_match {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == etag || candidate == "*"),
        None => false,
    }
}

fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
    accept_encoding.map_or(false, |value| {
        value
            .split(',')
            .any(|encoding| encoding.split(';').next().map(str::trim) == Some("gzip"))
    })
}

/// Content-Type según la extensión del archivo
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn is_compressible(content_type: &str) -> bool {
    content_type.starts_with("text/") || content_type == "image/svg+xml"
}

fn gzip(content: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content)?;
    encoder.finish()
}
