use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{SiteConfig, ADBOOK_FILE, ARTICLE_FILE, AUTHOR_FILE, KEYWORD_FILE, MAP_FILE};
use crate::error::LoadError;
use crate::normalize::{normalize, RawContent};
use crate::{
    AdBookDocument, ArticleDocument, AuthorDocument, Catalog, KeywordDocument, MapDocument,
};

pub struct ContentLoader {
    content_dir: PathBuf,
}

impl ContentLoader {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.content_dir.clone())
    }

    /// Reads every fixture concurrently, then normalizes them in one pass.
    ///
    /// A failed read never cancels the others. Authors, articles and the map are
    /// required; keywords and the ad-book are optional and simply skipped when absent.
    pub async fn load(&self) -> Result<Catalog, LoadError> {
        info!(dir = %self.content_dir.display(), "loading content");

        let (authors, articles, map, keywords, adbook) = tokio::join!(
            self.fetch::<AuthorDocument>(AUTHOR_FILE),
            self.fetch::<ArticleDocument>(ARTICLE_FILE),
            self.fetch::<MapDocument>(MAP_FILE),
            self.fetch::<KeywordDocument>(KEYWORD_FILE),
            self.fetch::<AdBookDocument>(ADBOOK_FILE),
        );

        let raw = RawContent {
            authors: authors.ok_or(LoadError::MissingSource(AUTHOR_FILE))?.authors,
            articles: articles.ok_or(LoadError::MissingSource(ARTICLE_FILE))?.articles,
            map: map.ok_or(LoadError::MissingSource(MAP_FILE))?.root,
            keywords: keywords.map(|d| d.keywords),
            adbook: adbook.map(|d| d.adbook),
        };

        let catalog = normalize(raw)?;
        info!(
            authors = catalog.authors.len(),
            articles = catalog.articles.len(),
            links = catalog.links.len(),
            keywords = catalog.keywords.len(),
            "content loaded"
        );
        Ok(catalog)
    }

    async fn fetch<T: DeserializeOwned>(&self, name: &'static str) -> Option<T> {
        match read_json(&self.content_dir.join(name)).await {
            Ok(document) => Some(document),
            Err(error) => {
                warn!(file = name, error = ?error, "failed to load content file");
                None
            }
        }
    }
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, json: &str) {
        fs::write(dir.join(name), json).unwrap();
    }

    fn write_core(dir: &Path) {
        write(
            dir,
            AUTHOR_FILE,
            r#"{"authors":[{"firstName":"Grace","lastName":"Hopper"}]}"#,
        );
        write(
            dir,
            ARTICLE_FILE,
            r#"{"articles":[{"links":[{"url":"https://cobol.example","title":"COBOL","languages":["en"],"formats":["PDF"]}],"authorIndexes":[0],"date":1959,"page":"cobol.html"}]}"#,
        );
        write(
            dir,
            MAP_FILE,
            r#"{"root":{"title":"root","children":[{"title":"COBOL","page":"cobol.html","languages":["en"],"formats":["HTML"]}]}}"#,
        );
    }

    #[tokio::test]
    async fn optional_files_may_be_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_core(dir.path());

        let catalog = ContentLoader::new(dir.path()).load().await.unwrap();
        assert_eq!(catalog.authors[0].articles, vec![0]);
        assert!(catalog.keywords.is_empty());
    }

    #[tokio::test]
    async fn missing_required_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_core(dir.path());
        fs::remove_file(dir.path().join(MAP_FILE)).unwrap();

        let err = ContentLoader::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, LoadError::MissingSource(MAP_FILE)));
    }

    #[tokio::test]
    async fn malformed_optional_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_core(dir.path());
        write(dir.path(), KEYWORD_FILE, "{ not json");

        let catalog = ContentLoader::new(dir.path()).load().await.unwrap();
        assert!(catalog.keywords.is_empty());
    }

    #[tokio::test]
    async fn read_json_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), AUTHOR_FILE, "[]");

        let err = read_json::<AuthorDocument>(&dir.path().join(AUTHOR_FILE))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains(AUTHOR_FILE));
    }
}
