//! HTML rendering. One template per page and locale; a page may point at its
//! own template file, otherwise the built-in one for its locale is used.

use crate::config::PageConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use minijinja::{Environment, Value};
use std::fs;

const BUILTIN: &[(&str, &str)] = &[
    ("schedule_fi.html", include_str!("templates/schedule_fi.html")),
    ("schedule_en.html", include_str!("templates/schedule_en.html")),
    ("supporters_fi.html", include_str!("templates/supporters_fi.html")),
    ("supporters_en.html", include_str!("templates/supporters_en.html")),
];

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> AppResult<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        for (name, source) in BUILTIN.iter().copied() {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Name of the template used for `page` of the `kind` pipeline
    /// ("schedule" or "supporters"), loading it from disk when needed.
    fn template_for(&mut self, kind: &str, page: &PageConfig) -> AppResult<String> {
        if let Some(path) = &page.template {
            let source = fs::read_to_string(expand_tilde(path)).map_err(|e| {
                AppError::Config(format!("cannot read template {path}: {e}"))
            })?;
            self.env.add_template_owned(path.clone(), source)?;
            return Ok(path.clone());
        }

        let name = format!("{kind}_{}.html", page.locale);
        if BUILTIN.iter().any(|(n, _)| *n == name) {
            Ok(name)
        } else {
            Err(AppError::Config(format!(
                "no built-in {kind} template for locale '{}'; set a template path",
                page.locale
            )))
        }
    }

    pub fn render(&mut self, kind: &str, page: &PageConfig, ctx: Value) -> AppResult<String> {
        let name = self.template_for(kind, page)?;
        let html = self.env.get_template(&name)?.render(ctx)?;
        Ok(html)
    }
}
