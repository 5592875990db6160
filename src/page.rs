//! Full HTML documents around rendered fragments.

use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;
use std::path::Path;

use crate::error::RenderError;

static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

const PAGE_TEMPLATE: &str = "page.hbs";

/// Values substituted into the page template. `body` is inserted unescaped.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub content_href: String,
    pub map_href: &'a str,
    pub keywords_href: Option<&'a str>,
}

pub struct PageShell {
    registry: Handlebars<'static>,
}

impl PageShell {
    pub fn new() -> Result<Self, RenderError> {
        let template = ASSETS
            .get_file(PAGE_TEMPLATE)
            .and_then(|f| f.contents_utf8())
            .ok_or(RenderError::MissingAsset(PAGE_TEMPLATE))?;
        let mut registry = Handlebars::new();
        registry.register_template_string(PAGE_TEMPLATE, template)?;
        Ok(Self { registry })
    }

    pub fn render(&self, context: &PageContext<'_>) -> Result<String, RenderError> {
        Ok(self.registry.render(PAGE_TEMPLATE, context)?)
    }
}

/// Static files served under `assets/`: everything embedded except the template.
pub fn asset_files() -> impl Iterator<Item = (&'static Path, &'static [u8])> {
    ASSETS
        .files()
        .filter(|f| f.path() != Path::new(PAGE_TEMPLATE))
        .map(|f| (f.path(), f.contents()))
}

pub fn asset(name: &str) -> Option<&'static [u8]> {
    asset_files()
        .find(|(path, _)| *path == Path::new(name))
        .map(|(_, contents)| contents)
}

pub fn content_type(name: &str) -> &'static str {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
