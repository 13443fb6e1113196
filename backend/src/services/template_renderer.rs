//! Jinja-style rendering for email templates.
//!
//! Subjects and bodies are rendered with `minijinja`, so templates can use
//! `{{ name }}` and `{{ user.name }}` placeholders, filters such as
//! `{{ name|upper }}` or `{{ name|default("there") }}`, `{% if %}` / `{% for %}`
//! blocks and `{# comments #}`.
//!
//! Undefined variables and JSON `null` render as the empty string. Output is
//! not HTML-escaped; bodies are authored as HTML and values are inserted as-is.

use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value as TemplateValue};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static ENVIRONMENT: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    env.set_formatter(|out, state, value| {
        minijinja::escape_formatter(
            out,
            state,
            if value.is_none() {
                &TemplateValue::UNDEFINED
            } else {
                value
            },
        )
    });
    env
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The template source does not parse.
    #[error("invalid template syntax: {0}")]
    Syntax(String),
    /// The template parsed but failed while rendering, e.g. an unknown filter.
    #[error("template rendering failed: {0}")]
    Evaluation(String),
}

impl From<minijinja::Error> for RenderError {
    fn from(error: minijinja::Error) -> Self {
        match error.kind() {
            ErrorKind::SyntaxError => RenderError::Syntax(error.to_string()),
            _ => RenderError::Evaluation(error.to_string()),
        }
    }
}

/// Renders `template` with `variables`.
pub fn render(template: &str, variables: &HashMap<String, Value>) -> Result<String, RenderError> {
    Ok(ENVIRONMENT.render_str(template, variables)?)
}
