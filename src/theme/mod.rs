//! Theme engine
//!
//! Renders the public reading pages with Tera. Templates are embedded in the
//! binary from `templates/` so the server needs no theme directory on disk.

use anyhow::Result;
use chrono::Datelike;
use rust_embed::RustEmbed;
use serde::Serialize;
use std::error::Error as StdError;
use tera::{Context as TeraContext, Tera};

use crate::services::PublicSite;

mod error;

pub use error::ThemeError;

/// Embedded page templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct Templates;

/// Template rendering for the reading site
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load every embedded template
    pub fn new() -> Result<Self> {
        let mut templates: Vec<(String, String)> = Vec::new();
        for name in Templates::iter() {
            let file = Templates::get(&name).ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
            let content = String::from_utf8(file.data.into_owned())
                .map_err(|e| ThemeError::TemplateError(format!("{} is not UTF-8: {}", name, e)))?;
            templates.push((name.to_string(), content));
        }
        Self::from_templates(templates)
    }

    /// Build from `(name, source)` pairs
    pub fn from_templates(mut templates: Vec<(String, String)>) -> Result<Self> {
        // Base layouts first so children can resolve them
        templates.sort_by(|a, b| {
            let a_is_base = a.0 == "base.html";
            let b_is_base = b.0 == "base.html";
            b_is_base.cmp(&a_is_base)
        });

        let mut tera = Tera::default();
        for (name, content) in &templates {
            tera.add_raw_template(name, content)
                .map_err(|e| ThemeError::TemplateError(format!("Failed to add template {}: {}", name, e)))?;
        }
        tera.build_inheritance_chains()
            .map_err(|e| ThemeError::TemplateError(format!("Failed to build template inheritance: {}", e)))?;

        tracing::debug!("Loaded {} page templates", templates.len());
        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            ThemeError::TemplateError(error_msg).into()
        })
    }

    /// Render with the site-wide variables every page expects
    pub fn render_page(&self, template: &str, context: &TeraContext, vars: &StandardTemplateVars) -> Result<String> {
        let mut full_context = context.clone();
        full_context.insert("site", &vars.site);
        full_context.insert("categories", &vars.categories);
        full_context.insert("request_path", &vars.request_path);
        full_context.insert("year", &vars.year);
        self.render(template, &full_context)
    }

    /// Render, or fall back to a bare error page if the template fails
    pub fn render_with_fallback(&self, template: &str, context: &TeraContext, vars: &StandardTemplateVars) -> String {
        match self.render_page(template, context, vars) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to render template '{}': {:#}", template, e);
                simple_error_page(&vars.site.site_name)
            }
        }
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }
}

fn simple_error_page(site_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>{}</title></head>
<body><h1>Something went wrong</h1><p>This page could not be displayed.</p></body>
</html>"#,
        tera::escape_html(site_name)
    )
}

/// Navigation entry shown in the page header
#[derive(Debug, Clone, Serialize)]
pub struct NavCategory {
    pub name: String,
    pub slug: String,
}

/// Variables injected into every page
#[derive(Debug, Clone, Serialize)]
pub struct StandardTemplateVars {
    pub site: PublicSite,
    pub categories: Vec<NavCategory>,
    pub request_path: String,
    /// Current year (for copyright)
    pub year: i32,
}

impl StandardTemplateVars {
    pub fn new(site: PublicSite, request_path: impl Into<String>) -> Self {
        Self {
            site,
            categories: Vec::new(),
            request_path: request_path.into(),
            year: chrono::Utc::now().year(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<NavCategory>) -> Self {
        self.categories = categories;
        self
    }
}
