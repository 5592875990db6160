//! Complete pages, and writing all of them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{
    author_popup_href, keyword_popup_href, letter_bar, ContentSort, ContentView, RenderOptions,
    SortLinks,
};
use crate::error::{RenderError, SiteError};
use crate::map::MapRenderer;
use crate::page::{asset_files, PageContext, PageShell};
use crate::popup::{author_popup, keyword_index, keyword_popup};
use crate::Catalog;

pub const MAP_PAGE: &str = "map.html";
pub const KEYWORDS_PAGE: &str = "keywords.html";
pub const ASSETS_DIR: &str = "assets";

/// Renders whole documents for one link style (query strings or static files).
pub struct SiteRenderer {
    shell: PageShell,
    options: RenderOptions,
}

impl SiteRenderer {
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        Ok(Self {
            shell: PageShell::new()?,
            options,
        })
    }

    pub fn content_page(&self, catalog: &Catalog, sort: ContentSort) -> Result<String, RenderError> {
        let mut body = letter_bar()?;
        body.append(&ContentView::new(catalog, &self.options, sort).render()?);
        let title = format!("Content sorted by {}", sort);
        self.wrap(catalog, &title, body.as_str(), sort)
    }

    pub fn map_page(&self, catalog: &Catalog, target: Option<&str>) -> Result<String, RenderError> {
        let body = MapRenderer::new(target.map(str::to_string), self.options.page_prefix.as_str())
            .render_tree(&catalog.map)?;
        self.wrap(catalog, "Map", body.as_str(), ContentSort::default())
    }

    pub fn keywords_page(&self, catalog: &Catalog) -> Result<String, RenderError> {
        let body = keyword_index(catalog)?;
        self.wrap(catalog, "Keywords", body.as_str(), ContentSort::default())
    }

    fn wrap(
        &self,
        catalog: &Catalog,
        title: &str,
        body: &str,
        sort: ContentSort,
    ) -> Result<String, RenderError> {
        self.shell.render(&PageContext {
            title,
            body,
            content_href: self.options.sort_links.href(sort),
            map_href: MAP_PAGE,
            keywords_href: (!catalog.keywords.is_empty()).then_some(KEYWORDS_PAGE),
        })
    }
}

/// Writes the static site: one content page per sort, the map, keywords, popups, assets.
pub struct SiteWriter<'a> {
    catalog: &'a Catalog,
    renderer: SiteRenderer,
    target_page: Option<String>,
    static_dir: Option<PathBuf>,
}

impl<'a> SiteWriter<'a> {
    pub fn new(catalog: &'a Catalog, config: &SiteConfig) -> Result<Self, RenderError> {
        Ok(Self {
            catalog,
            renderer: SiteRenderer::new(config.render_options(SortLinks::Files))?,
            target_page: None,
            static_dir: config.static_dir.clone(),
        })
    }

    pub fn with_target_page(mut self, page: Option<String>) -> Self {
        self.target_page = page;
        self
    }

    /// Renders everything first, so a data error leaves the output directory untouched.
    pub fn write(&self, output: &Path) -> Result<usize, SiteError> {
        let files = self.render_all()?;

        for (relative, contents) in &files {
            write_file(&output.join(relative), contents)?;
        }
        for (path, contents) in asset_files() {
            write_file(&output.join(ASSETS_DIR).join(path), contents)?;
        }
        let copied = match &self.static_dir {
            Some(dir) => copy_static(dir, output)?,
            None => 0,
        };

        info!(
            pages = files.len(),
            copied,
            output = %output.display(),
            "site written"
        );
        Ok(files.len())
    }

    fn render_all(&self) -> Result<Vec<(PathBuf, Vec<u8>)>, RenderError> {
        let mut files = Vec::new();
        for sort in ContentSort::ALL {
            let page = self.renderer.content_page(self.catalog, sort)?;
            files.push((PathBuf::from(sort.file_name()), page.into_bytes()));
        }
        let map = self
            .renderer
            .map_page(self.catalog, self.target_page.as_deref())?;
        files.push((PathBuf::from(MAP_PAGE), map.into_bytes()));

        if !self.catalog.keywords.is_empty() {
            let keywords = self.renderer.keywords_page(self.catalog)?;
            files.push((PathBuf::from(KEYWORDS_PAGE), keywords.into_bytes()));
        }

        for id in 0..self.catalog.authors.len() {
            let popup = author_popup(self.catalog, id)?;
            files.push((PathBuf::from(author_popup_href(id)), popup.into_string().into_bytes()));
        }
        for index in 0..self.catalog.keywords.len() {
            let popup = keyword_popup(self.catalog, index)?;
            files.push((
                PathBuf::from(keyword_popup_href(index)),
                popup.into_string().into_bytes(),
            ));
        }
        debug!(files = files.len(), "rendered site");
        Ok(files)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SiteError> {
    let io_error = |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

/// Copies every file under `source` into `output`, keeping relative paths.
pub fn copy_static(source: &Path, output: &Path) -> Result<usize, SiteError> {
    let mut copied = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| SiteError::Walk {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path());
        let dest = output.join(relative);
        let contents = fs::read(entry.path()).map_err(|source| SiteError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        write_file(&dest, &contents)?;
        copied += 1;
    }
    Ok(copied)
}
