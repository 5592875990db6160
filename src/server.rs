//! Preview server: renders pages per request and reloads content when fixtures change.

use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::SiteConfig;
use crate::content::{ContentSort, SortLinks};
use crate::error::{LoadError, RenderError};
use crate::html::escape;
use crate::loader::ContentLoader;
use crate::page::{asset, content_type};
use crate::popup::{author_popup, keyword_popup};
use crate::site::SiteRenderer;
use crate::Catalog;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("content is not available, check the server log")]
    Unavailable,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Render(e) => {
                error!(error = %e, "render failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = format!("<p class=\"error\">{}</p>", escape(&self.to_string()));
        (status, Html(body)).into_response()
    }
}

struct Shared {
    config: SiteConfig,
    renderer: SiteRenderer,
    catalog: RwLock<Option<Arc<Catalog>>>,
}

#[derive(Clone)]
pub struct AppState {
    shared: Arc<Shared>,
}

impl AppState {
    /// State with no content yet; call [`AppState::reload`] to load it.
    pub fn new(config: SiteConfig) -> Result<Self, RenderError> {
        Ok(Self {
            shared: Arc::new(Shared {
                renderer: SiteRenderer::new(config.render_options(SortLinks::Query))?,
                config,
                catalog: RwLock::new(None),
            }),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.shared.config
    }

    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.shared
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, catalog: Catalog) {
        *self
            .shared
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(catalog));
    }

    /// Loads the fixtures again. On failure the previous catalog stays in place.
    pub async fn reload(&self) -> Result<(), LoadError> {
        let catalog = ContentLoader::from_config(&self.shared.config).load().await?;
        self.replace(catalog);
        info!("content reloaded");
        Ok(())
    }

    fn current(&self) -> Result<Arc<Catalog>, ServerError> {
        self.catalog().ok_or(ServerError::Unavailable)
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub page: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let router = Router::new()
        .route("/", get(|| async { Redirect::temporary("/content.html") }))
        .route("/content.html", get(content_page))
        .route("/map.html", get(map_page))
        .route("/keywords.html", get(keywords_page))
        .route("/popup/:file", get(popup))
        .route("/assets/:file", get(asset_file));
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "preview server listening");
    axum::serve(listener, router(state)).await
}

async fn content_page(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<Html<String>, ServerError> {
    let catalog = state.current()?;
    let sort = ContentSort::from_query(query.sort.as_deref());
    Ok(Html(state.shared.renderer.content_page(&catalog, sort)?))
}

async fn map_page(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, ServerError> {
    let catalog = state.current()?;
    Ok(Html(
        state
            .shared
            .renderer
            .map_page(&catalog, query.page.as_deref())?,
    ))
}

async fn keywords_page(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let catalog = state.current()?;
    Ok(Html(state.shared.renderer.keywords_page(&catalog)?))
}

enum PopupKind {
    Author,
    Keyword,
}

fn parse_popup_file(file: &str) -> Option<(PopupKind, usize)> {
    let stem = file.strip_suffix(".html")?;
    if let Some(index) = stem.strip_prefix("author-") {
        return Some((PopupKind::Author, index.parse().ok()?));
    }
    if let Some(index) = stem.strip_prefix("keyword-") {
        return Some((PopupKind::Keyword, index.parse().ok()?));
    }
    None
}

async fn popup(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Html<String>, ServerError> {
    let catalog = state.current()?;
    let (kind, index) = parse_popup_file(&file).ok_or(ServerError::NotFound)?;
    let html = match kind {
        PopupKind::Author => author_popup(&catalog, index),
        PopupKind::Keyword => keyword_popup(&catalog, index),
    }
    .map_err(|e| match e {
        RenderError::UnknownAuthor(_) | RenderError::UnknownKeyword(_) => ServerError::NotFound,
        other => ServerError::Render(other),
    })?;
    Ok(Html(html.into_string()))
}

async fn asset_file(Path(file): Path<String>) -> Result<Response, ServerError> {
    let contents = asset(&file).ok_or(ServerError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, content_type(&file))], contents).into_response())
}

/// Reloads the catalog whenever one of the fixtures changes. Keep the returned
/// watcher alive for as long as reloading should happen.
pub fn watch_content(state: AppState) -> notify::Result<RecommendedWatcher> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let config = state.config().clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) if event.paths.iter().any(|p| config.is_content_file(p)) => {
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "content watcher error"),
        }
    })?;
    watcher.watch(&state.config().content_dir, RecursiveMode::NonRecursive)?;

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // editors write in bursts
            tokio::time::sleep(Duration::from_millis(200)).await;
            while rx.try_recv().is_ok() {}
            if let Err(e) = state.reload().await {
                error!(error = %e, "reload failed, keeping previous content");
            }
        }
    });
    Ok(watcher)
}
