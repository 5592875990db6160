use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type AuthorId = usize;
pub type ArticleId = usize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name_suffix: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    // --- filled during normalization ---
    #[serde(skip)]
    pub articles: Vec<ArticleId>,
    #[serde(skip)]
    pub links: Vec<Link>,
}

impl Author {
    /// True when all six name parts are equal, which is how ad-book records find their author.
    pub fn same_name(&self, other: &Author) -> bool {
        self.name_prefix == other.name_prefix
            && self.first_name == other.first_name
            && self.middle_name == other.middle_name
            && self.last_name == other.last_name
            && self.name_suffix == other.name_suffix
            && self.given_name == other.given_name
    }

    /// Name parts joined by spaces, the given name quoted.
    pub fn display_name(&self) -> String {
        let quoted = self.given_name.as_ref().map(|g| format!("\"{}\"", g));
        [
            self.name_prefix.as_ref(),
            self.first_name.as_ref(),
            self.middle_name.as_ref(),
            self.last_name.as_ref(),
            self.name_suffix.as_ref(),
            quoted.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<Vec<String>>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub protection: Option<String>,
    #[serde(skip)]
    pub article: Option<ArticleId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub links: Vec<Link>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub author_indexes: Option<Vec<usize>>,
    pub page: String,
    #[serde(skip)]
    pub authors: Vec<AuthorId>,
}

impl Article {
    /// The first link stands for the whole article. Normalization rejects link-less articles.
    pub fn representative_link(&self) -> &Link {
        &self.links[0]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub article_indexes: Vec<usize>,
    #[serde(skip)]
    pub articles: Vec<ArticleId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    pub title: String,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub children: Option<Vec<MapNode>>,
    #[serde(skip)]
    pub open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdBookEntry {
    pub author: Author,
    #[serde(default)]
    pub links: Vec<Link>,
}

// --- on-disk documents ---

#[derive(Debug, Deserialize)]
pub struct AuthorDocument {
    pub authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleDocument {
    pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub struct MapDocument {
    pub root: MapNode,
}

#[derive(Debug, Deserialize)]
pub struct KeywordDocument {
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Deserialize)]
pub struct AdBookDocument {
    pub adbook: Vec<AdBookEntry>,
}

/// Position of a link inside its article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRef {
    pub article: ArticleId,
    pub index: usize,
}

/// Metadata of a page-bearing map node, used to title "referring page" links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub languages: Vec<String>,
    pub formats: Vec<String>,
}

/// The normalized, read-only model every renderer works from.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub authors: Vec<Author>,
    pub articles: Vec<Article>,
    /// Every link of every article, sorted by scheme-less URL.
    pub links: Vec<LinkRef>,
    pub pages: BTreeMap<String, PageInfo>,
    pub map: MapNode,
    pub keywords: Vec<Keyword>,
}

impl Catalog {
    pub fn link(&self, link: LinkRef) -> &Link {
        &self.articles[link.article].links[link.index]
    }
}

pub mod collate;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod html;
pub mod loader;
pub mod map;
pub mod normalize;
pub mod page;
pub mod popup;
pub mod server;
pub mod site;

pub use config::SiteConfig;
pub use error::{FormatError, HtmlError, LoadError, RenderError, SiteError};
pub use html::HtmlString;
