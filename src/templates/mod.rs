//! Page shell templates using the Tera template engine
//!
//! The layouts are embedded directly in the binary. Block markup arrives
//! pre-rendered and is inserted with `| safe`; every other value is escaped.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::Layout;
use crate::helpers::{html_escape, tel_href};

/// Template for the branded not-found page
pub const NOT_FOUND_TEMPLATE: &str = "not_found.html";

/// Template renderer with the embedded page shells
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all shells loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        // Leave `/` alone so hrefs stay readable
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("base.html", include_str!("layouts/base.html")),
            ("_sections.html", include_str!("layouts/_sections.html")),
            (
                Layout::Standard.template_name(),
                include_str!("layouts/standard.html"),
            ),
            (
                Layout::Landing.template_name(),
                include_str!("layouts/landing.html"),
            ),
            (NOT_FOUND_TEMPLATE, include_str!("layouts/not_found.html")),
        ])?;

        // Register custom filters
        tera.register_filter("tel_href", tel_href_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: phone number to `tel:` link target
fn tel_href_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("tel_href", "value", String, value);
    Ok(tera::Value::String(tel_href(&s)))
}
