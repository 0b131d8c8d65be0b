//! # Handlers HTTP de Tareas
//! src/tasks/handlers.rs
//!
//! Endpoints:
//! - `GET  /tasks`              - Lista completa renderizada en HTML
//! - `POST /tasks`              - Crear tarea (campo `title`)
//! - `POST /tasks/{id}/edit`    - Reemplazar el título
//! - `POST /tasks/{id}/delete`  - Borrar tarea
//!
//! Cada handler instrumentado toma el instante de inicio, la sesión
//! (cookie `sid`), un request id de 8 caracteres y el modo JS (header
//! `HX-Request`), ejecuta la operación, escribe la fila CSV y responde.
//! Los 404 de edición y borrado no escriben fila.

use crate::error::AppError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::metrics::TaskCode;
use crate::router::{PathParams, Router};
use crate::state::AppState;
use crate::tasks::model::{validate_title, Task, ValidationError};
use crate::tasks::store::StoreError;
use minijinja::context;
use std::time::Instant;
use uuid::Uuid;

/// Cookie con el identificador de sesión del estudio
pub const SESSION_COOKIE: &str = "sid";

/// Sesión usada cuando el cliente no manda la cookie
pub const ANONYMOUS_SESSION: &str = "P_anon";

/// Header que envían los clientes AJAX (htmx)
pub const AJAX_HEADER: &str = "HX-Request";

/// Destino de las redirecciones después de un POST exitoso
pub const TASKS_PATH: &str = "/tasks";

const REQUEST_ID_LEN: usize = 8;

/// Registra las rutas de tareas en el router
pub fn register(router: &mut Router) -> Result<(), regex::Error> {
    router.register(Method::GET, "/tasks", list_handler)?;
    router.register(Method::POST, "/tasks", create_handler)?;
    router.register(Method::POST, "/tasks/{id}/edit", edit_handler)?;
    router.register(Method::POST, "/tasks/{id}/delete", delete_handler)?;
    Ok(())
}

/// Datos de instrumentación capturados al entrar al handler
struct RequestMeta {
    started: Instant,
    session_id: String,
    request_id: String,
    js_mode: &'static str,
}

impl RequestMeta {
    fn capture(request: &Request) -> Self {
        let js_mode = if request.header(AJAX_HEADER) == Some("true") {
            "on"
        } else {
            "off"
        };

        Self {
            started: Instant::now(),
            session_id: request
                .cookie(SESSION_COOKIE)
                .unwrap_or(ANONYMOUS_SESSION)
                .to_string(),
            request_id: Uuid::new_v4().simple().to_string()[..REQUEST_ID_LEN].to_string(),
            js_mode,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Expone el request id de la fila CSV en la respuesta
    fn tag(&self, response: Response) -> Response {
        response.with_header("X-Request-Id", &self.request_id)
    }

    fn reject(
        &self,
        state: &AppState,
        task_code: TaskCode,
        error: ValidationError,
    ) -> Result<Response, AppError> {
        state.logger.validation_error(
            &self.session_id,
            &self.request_id,
            task_code,
            error.outcome(),
            self.js_mode,
        )?;

        tracing::info!(
            request_id = %self.request_id,
            task_code = task_code.as_str(),
            reason = %error,
            "title rejected"
        );

        let body = format!("Error: {}", error);
        Ok(self.tag(Response::text(StatusCode::BadRequest, &body)))
    }

    fn succeed(&self, state: &AppState, task_code: TaskCode) -> Result<Response, AppError> {
        state.logger.success(
            &self.session_id,
            &self.request_id,
            task_code,
            self.elapsed_ms(),
            self.js_mode,
        )?;

        Ok(self.tag(Response::redirect(TASKS_PATH)))
    }
}

/// Handler para GET /tasks
pub fn list_handler(
    _req: &Request,
    _params: &PathParams,
    state: &AppState,
) -> Result<Response, AppError> {
    let tasks = state.store.get_all();
    let html = state
        .renderer
        .render("tasks/index.html", context! { tasks => &tasks })?;

    Ok(Response::html(&html))
}

/// Handler para POST /tasks
///
/// Un campo `title` ausente se trata como vacío.
pub fn create_handler(
    req: &Request,
    _params: &PathParams,
    state: &AppState,
) -> Result<Response, AppError> {
    let meta = RequestMeta::capture(req);
    let title = req.form_field("title").unwrap_or("");

    if let Err(error) = validate_title(title) {
        return meta.reject(state, TaskCode::Add, error);
    }

    let task = Task::new(title);
    let task_id = task.id.clone();
    state.store.add(task)?;
    tracing::info!(request_id = %meta.request_id, task_id = %task_id, "task created");

    meta.succeed(state, TaskCode::Add)
}

/// Handler para POST /tasks/{id}/edit
///
/// Por defecto el nuevo título no se valida; con `validate_edits` se
/// aplica la misma regla que al crear.
pub fn edit_handler(
    req: &Request,
    params: &PathParams,
    state: &AppState,
) -> Result<Response, AppError> {
    let meta = RequestMeta::capture(req);

    let Some(id) = params.get("id") else {
        return Ok(Response::empty(StatusCode::NotFound));
    };
    let title = req.form_field("title").unwrap_or("");

    let Some(existing) = state.store.get_by_id(id) else {
        return Ok(Response::empty(StatusCode::NotFound));
    };

    if state.validate_edits {
        if let Err(error) = validate_title(title) {
            return meta.reject(state, TaskCode::Edit, error);
        }
    }

    match state.store.update(existing.with_title(title)) {
        Ok(()) => {}
        // Borrada por otro request entre la búsqueda y el update
        Err(StoreError::NotFound(_)) => return Ok(Response::empty(StatusCode::NotFound)),
        Err(e) => return Err(e.into()),
    }
    tracing::info!(request_id = %meta.request_id, task_id = id, "task edited");

    meta.succeed(state, TaskCode::Edit)
}

/// Handler para POST /tasks/{id}/delete
pub fn delete_handler(
    req: &Request,
    params: &PathParams,
    state: &AppState,
) -> Result<Response, AppError> {
    let meta = RequestMeta::capture(req);

    let Some(id) = params.get("id") else {
        return Ok(Response::empty(StatusCode::NotFound));
    };

    if !state.store.delete(id) {
        return Ok(Response::empty(StatusCode::NotFound));
    }
    tracing::info!(request_id = %meta.request_id, task_id = id, "task deleted");

    meta.succeed(state, TaskCode::Delete)
}
