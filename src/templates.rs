// src/templates.rs
use std::path::Path;

use axum::response::Html;
use tera::{Context, Tera};
use tracing::info;

use crate::error::AppResult;

pub const INDEX_TEMPLATE: &str = "polls/index.html";
pub const DETAIL_TEMPLATE: &str = "polls/detail.html";

/// Named HTML templates. `.html` names are autoescaped.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// The templates compiled into the binary.
    pub fn builtin() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates([
            (INDEX_TEMPLATE, include_str!("../templates/polls/index.html")),
            (DETAIL_TEMPLATE, include_str!("../templates/polls/detail.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Loads every `**/*.html` under `dir`, named by their path relative to it.
    pub fn from_dir(dir: &Path) -> tera::Result<Self> {
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob)?;
        info!("Loaded {} templates from {}", tera.get_template_names().count(), dir.display());
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> AppResult<Html<String>> {
        Ok(Html(self.tera.render(name, context)?))
    }
}
