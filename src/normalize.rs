//! The single pass that turns raw fixtures into a cross-linked [`Catalog`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::collate::{compare_articles_by_date, compare_urls};
use crate::error::LoadError;
use crate::{AdBookEntry, Article, Author, Catalog, Keyword, LinkRef, MapNode, PageInfo};

/// Fixtures as read from disk, before any cross-referencing.
#[derive(Debug, Clone, Default)]
pub struct RawContent {
    pub authors: Vec<Author>,
    pub articles: Vec<Article>,
    pub map: MapNode,
    pub keywords: Option<Vec<Keyword>>,
    pub adbook: Option<Vec<AdBookEntry>>,
}

pub fn normalize(raw: RawContent) -> Result<Catalog, LoadError> {
    let RawContent {
        mut authors,
        mut articles,
        map,
        keywords,
        adbook,
    } = raw;

    // authors and link back-references
    let mut links = Vec::new();
    for (article_id, article) in articles.iter_mut().enumerate() {
        if article.links.is_empty() {
            return Err(LoadError::EmptyArticle(article_id));
        }
        if let Some(indexes) = &article.author_indexes {
            for &index in indexes {
                let author = authors.get_mut(index).ok_or(LoadError::DanglingAuthor {
                    article: article_id,
                    index,
                })?;
                author.articles.push(article_id);
            }
            article.authors = indexes.clone();
        }
        for (index, link) in article.links.iter_mut().enumerate() {
            link.article = Some(article_id);
            links.push(LinkRef {
                article: article_id,
                index,
            });
        }
    }

    for author in &mut authors {
        author
            .articles
            .sort_by(|&a1, &a2| compare_articles_by_date(&articles[a1], &articles[a2]));
    }

    links.sort_by(|l1, l2| {
        compare_urls(
            &articles[l1.article].links[l1.index].url,
            &articles[l2.article].links[l2.index].url,
        )
    });

    let mut pages = BTreeMap::new();
    insert_pages(&map, &mut pages)?;

    if let Some(entries) = adbook {
        attach_adbook(&mut authors, entries);
    }

    let keywords = match keywords {
        Some(keywords) => resolve_keywords(keywords, articles.len())?,
        None => Vec::new(),
    };

    debug!(
        authors = authors.len(),
        articles = articles.len(),
        links = links.len(),
        pages = pages.len(),
        keywords = keywords.len(),
        "normalized content"
    );

    Ok(Catalog {
        authors,
        articles,
        links,
        pages,
        map,
        keywords,
    })
}

fn insert_pages(node: &MapNode, pages: &mut BTreeMap<String, PageInfo>) -> Result<(), LoadError> {
    if let Some(page) = &node.page {
        match pages.entry(page.clone()) {
            Entry::Occupied(_) => return Err(LoadError::DuplicatePage(page.clone())),
            Entry::Vacant(slot) => {
                slot.insert(PageInfo {
                    title: node.title.clone(),
                    languages: node.languages.clone(),
                    formats: node.formats.clone(),
                });
            }
        }
    }
    for child in node.children.iter().flatten() {
        insert_pages(child, pages)?;
    }
    Ok(())
}

fn attach_adbook(authors: &mut [Author], entries: Vec<AdBookEntry>) {
    for entry in entries {
        match authors.iter_mut().find(|a| a.same_name(&entry.author)) {
            Some(author) => author.links.extend(entry.links),
            None => warn!(
                name = %entry.author.display_name(),
                "ad-book entry does not match any author"
            ),
        }
    }
}

fn resolve_keywords(mut keywords: Vec<Keyword>, article_count: usize) -> Result<Vec<Keyword>, LoadError> {
    for keyword in &mut keywords {
        if let Some(&index) = keyword.article_indexes.iter().find(|&&i| i >= article_count) {
            return Err(LoadError::DanglingArticle {
                keyword: keyword.id.clone(),
                index,
            });
        }
        keyword.articles = keyword.article_indexes.clone();
    }
    Ok(keywords)
}
