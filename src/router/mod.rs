//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, patrón de path) a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Los patrones admiten segmentos `{nombre}` (ej: `/tasks/{id}/edit`) que
//! se compilan a expresiones regulares ancladas; los valores capturados
//! llegan al handler como `PathParams`. Si ningún patrón coincide se
//! retorna 404; si el path coincide pero no el método, 405.

use crate::error::AppError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::state::AppState;
use regex::Regex;
use std::collections::HashMap;

/// Tipo de función handler
///
/// Recibe el request, los parámetros del path y el estado compartido.
pub type Handler = fn(&Request, &PathParams, &AppState) -> Result<Response, AppError>;

/// Valores capturados por los segmentos `{nombre}` del patrón
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }
}

struct Route {
    method: Method,
    pattern: String,
    regex: Regex,
    params: Vec<String>,
    handler: Handler,
}

impl Route {
    fn matches(&self, path: &str) -> Option<PathParams> {
        let captures = self.regex.captures(path)?;
        let params = self
            .params
            .iter()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|value| (name.clone(), value.as_str().to_string()))
            })
            .collect();
        Some(PathParams(params))
    }

    fn accepts(&self, method: Method) -> bool {
        self.method == method || (method == Method::HEAD && self.method == Method::GET)
    }
}

/// Router que mapea patrones a handlers
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

/// Compila `/tasks/{id}/edit` a `^/tasks/(?P<id>[^/]+)/edit$`
fn compile_pattern(pattern: &str) -> Result<(Regex, Vec<String>), regex::Error> {
    let mut expression = String::from("^");
    let mut params = Vec::new();

    for (i, segment) in pattern.split('/').enumerate() {
        if i > 0 {
            expression.push('/');
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                expression.push_str(&format!("(?P<{}>[^/]+)", name));
                params.push(name.to_string());
            }
            None => expression.push_str(&regex::escape(segment)),
        }
    }
    expression.push('$');

    Ok((Regex::new(&expression)?, params))
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// Falla solo si el patrón produce una expresión regular inválida
    /// (por ejemplo, un nombre de parámetro con caracteres no permitidos).
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
    ) -> Result<(), regex::Error> {
        let (regex, params) = compile_pattern(pattern)?;
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            regex,
            params,
            handler,
        });
        Ok(())
    }

    /// Patrones registrados, en orden ("GET /tasks", ...)
    pub fn routes(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|route| format!("{} {}", route.method.as_str(), route.pattern))
            .collect()
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request, state: &AppState) -> Response {
        let path = request.path();
        let mut allowed = Vec::new();

        for route in &self.routes {
            let Some(params) = route.matches(path) else {
                continue;
            };

            if !route.accepts(request.method()) {
                allowed.push(route.method.as_str());
                continue;
            }

            let response = match (route.handler)(request, &params, state) {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        method = request.method().as_str(),
                        path,
                        error = %e,
                        "handler failed"
                    );
                    Response::empty(StatusCode::InternalServerError)
                }
            };
            return Self::with_common_headers(response);
        }

        let response = if allowed.is_empty() {
            Response::error(StatusCode::NotFound, &format!("Route not found: {}", path))
        } else {
            Response::empty(StatusCode::MethodNotAllowed).with_header("Allow", &allowed.join(", "))
        };
        Self::with_common_headers(response)
    }

    /// Agrega headers comunes a todas las respuestas
    pub fn with_common_headers(mut response: Response) -> Response {
        response.add_header("Server", "TasksServer-HTTP/1.0");
        response.add_header("Connection", "close");
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticFiles;
    use crate::metrics::MetricsLogger;
    use crate::render::Renderer;
    use std::io;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let logger = MetricsLogger::open(dir.path().join("metrics.csv")).unwrap();
        AppState::new(logger, Renderer::new().unwrap(), StaticFiles::new(dir.path()))
    }

    fn ok_handler(_req: &Request, _params: &PathParams, _state: &AppState) -> Result<Response, AppError> {
        Ok(Response::text(StatusCode::Ok, "ok"))
    }

    fn echo_id_handler(_req: &Request, params: &PathParams, _state: &AppState) -> Result<Response, AppError> {
        Ok(Response::text(StatusCode::Ok, params.get("id").unwrap_or("none")))
    }

    fn failing_handler(_req: &Request, _params: &PathParams, _state: &AppState) -> Result<Response, AppError> {
        Err(AppError::MetricsLog(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")))
    }

    fn request(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_compile_pattern() {
        let (regex, params) = compile_pattern("/tasks/{id}/edit").unwrap();

        assert_eq!(regex.as_str(), "^/tasks/(?P<id>[^/]+)/edit$");
        assert_eq!(params, vec!["id".to_string()]);
    }

    #[test]
    fn test_register_route() {
        let mut router = Router::new();
        router.register(Method::GET, "/tasks", ok_handler).unwrap();
        router.register(Method::POST, "/tasks/{id}/delete", ok_handler).unwrap();

        assert_eq!(router.routes(), vec!["GET /tasks", "POST /tasks/{id}/delete"]);
    }

    #[test]
    fn test_invalid_param_name() {
        let mut router = Router::new();
        assert!(router.register(Method::GET, "/tasks/{bad name}", ok_handler).is_err());
    }

    #[test]
    fn test_route_found_with_params() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::POST, "/tasks/{id}/edit", echo_id_handler).unwrap();

        let response = router.route(&request("POST /tasks/abc-123/edit HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"abc-123");
        assert_eq!(response.header("Connection"), Some("close"));
    }

    #[test]
    fn test_pattern_does_not_match_extra_segments() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::POST, "/tasks/{id}/edit", echo_id_handler).unwrap();

        let response = router.route(&request("POST /tasks/a/b/edit HTTP/1.0\r\n\r\n"), &state);
        assert_eq!(response.status(), StatusCode::NotFound);

        let response = router.route(&request("POST /tasks//edit HTTP/1.0\r\n\r\n"), &state);
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_route_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let router = Router::new();

        let response = router.route(&request("GET /nonexistent HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(String::from_utf8_lossy(response.body()).contains("Route not found"));
    }

    #[test]
    fn test_method_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::POST, "/tasks/{id}/delete", ok_handler).unwrap();

        let response = router.route(&request("GET /tasks/1/delete HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::MethodNotAllowed);
        assert_eq!(response.header("Allow"), Some("POST"));
    }

    #[test]
    fn test_head_uses_get_route() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::GET, "/tasks", ok_handler).unwrap();

        let response = router.route(&request("HEAD /tasks HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::Ok);
    }

    #[test]
    fn test_same_path_different_methods() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::GET, "/tasks", ok_handler).unwrap();
        router.register(Method::POST, "/tasks", echo_id_handler).unwrap();

        let get = router.route(&request("GET /tasks HTTP/1.0\r\n\r\n"), &state);
        let post = router.route(&request("POST /tasks HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(get.body(), b"ok");
        assert_eq!(post.body(), b"none");
    }

    #[test]
    fn test_handler_error_becomes_500_without_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut router = Router::new();
        router.register(Method::POST, "/tasks", failing_handler).unwrap();

        let response = router.route(&request("POST /tasks HTTP/1.0\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::InternalServerError);
        assert!(response.body().is_empty());
    }
}
