//! # Renderizado de Templates
//! src/render/mod.rs
//!
//! Envuelve un `minijinja::Environment` creado una sola vez al arrancar.
//! Los templates se embeben en el binario desde `templates/`; el
//! auto-escape HTML queda activo para todo template `.html`, así un
//! título con `<b>` se muestra como texto y no como markup.

use minijinja::Environment;
use serde::Serialize;

pub use minijinja::Error as RenderError;

/// Templates embebidos: (nombre, fuente)
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("tasks/index.html", include_str!("../../templates/tasks/index.html")),
];

/// Motor de templates compartido por todo el proceso
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Carga y compila todos los templates embebidos
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Renderiza `name` con el contexto dado
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, RenderError> {
        self.env.get_template(name)?.render(context)
    }
}
