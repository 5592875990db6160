use std::path::{Path, PathBuf};

use crate::content::{RenderOptions, SortLinks};

pub const AUTHOR_FILE: &str = "author.json";
pub const ARTICLE_FILE: &str = "article.json";
pub const MAP_FILE: &str = "map.json";
pub const KEYWORD_FILE: &str = "keyword.json";
pub const ADBOOK_FILE: &str = "adbook.json";

/// Settings shared by the generator and the preview server.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory holding the JSON fixtures.
    pub content_dir: PathBuf,
    /// Prepended to a map page identifier to build its href.
    pub page_prefix: String,
    /// Extra files copied (or served) next to the generated pages.
    pub static_dir: Option<PathBuf>,
}

impl SiteConfig {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            page_prefix: "../".to_string(),
            static_dir: None,
        }
    }

    pub fn with_page_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.page_prefix = prefix.into();
        self
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    pub fn render_options(&self, sort_links: SortLinks) -> RenderOptions {
        RenderOptions {
            page_prefix: self.page_prefix.clone(),
            sort_links,
        }
    }

    pub fn is_content_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| {
                [AUTHOR_FILE, ARTICLE_FILE, MAP_FILE, KEYWORD_FILE, ADBOOK_FILE].contains(&n)
            })
    }
}
