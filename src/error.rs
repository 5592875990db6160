use std::path::PathBuf;

use thiserror::Error;

/// Misuse of the HTML builder.
#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("odd number of attribute arguments ({count}) for <{tag}>")]
    InvalidArgument { tag: String, count: usize },
}

/// Source data that cannot be formatted. These point at fixtures that need fixing upstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid date {0}")]
    InvalidDate(i64),
    #[error("invalid month {month} in date {date}")]
    InvalidMonth { date: i64, month: i64 },
    #[error("invalid duration {0} (expected 0 < duration < 86400)")]
    InvalidDuration(i64),
    #[error("unknown link status \"{0}\"")]
    UnknownStatus(String),
    #[error("unknown link protection \"{0}\"")]
    UnknownProtection(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("required content file {0} is unavailable")]
    MissingSource(&'static str),
    #[error("article {0} has no link")]
    EmptyArticle(usize),
    #[error("article {article} refers to unknown author {index}")]
    DanglingAuthor { article: usize, index: usize },
    #[error("keyword \"{keyword}\" refers to unknown article {index}")]
    DanglingArticle { keyword: String, index: usize },
    #[error("page \"{0}\" appears more than once in the map")]
    DuplicatePage(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Html(#[from] HtmlError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("page \"{0}\" is not in the map")]
    UnknownPage(String),
    #[error("no author with index {0}")]
    UnknownAuthor(usize),
    #[error("no keyword with index {0}")]
    UnknownKeyword(usize),
    #[error("failed to render page template")]
    Template(#[from] handlebars::RenderError),
    #[error("invalid page template")]
    InvalidTemplate(#[from] handlebars::TemplateError),
    #[error("embedded asset {0} is missing")]
    MissingAsset(&'static str),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
