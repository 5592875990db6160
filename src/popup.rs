//! Detail fragments shown when an author or a keyword is clicked.

use crate::content::{keyword_popup_href, link_anchor};
use crate::error::RenderError;
use crate::format::date_to_text;
use crate::html::HtmlString;
use crate::{ArticleId, AuthorId, Catalog, Link};

pub fn author_popup(catalog: &Catalog, id: AuthorId) -> Result<HtmlString, RenderError> {
    let author = catalog
        .authors
        .get(id)
        .ok_or(RenderError::UnknownAuthor(id))?;

    let mut html = HtmlString::from_tag("h1", author.display_name().as_str());
    let articles = article_list(catalog, &author.articles)?;
    if !articles.is_empty() {
        html.append_tag("h2", "Articles").append(&articles);
    }
    let links = link_list(&author.links)?;
    if !links.is_empty() {
        html.append_tag("h2", "Links").append(&links);
    }
    Ok(html)
}

pub fn keyword_popup(catalog: &Catalog, index: usize) -> Result<HtmlString, RenderError> {
    let keyword = catalog
        .keywords
        .get(index)
        .ok_or(RenderError::UnknownKeyword(index))?;

    let mut html = HtmlString::from_tag("h1", keyword.id.as_str());
    let links = link_list(&keyword.links)?;
    if !links.is_empty() {
        html.append_tag("h2", "Links").append(&links);
    }
    let articles = article_list(catalog, &keyword.articles)?;
    if !articles.is_empty() {
        html.append_tag("h2", "Articles").append(&articles);
    }
    Ok(html)
}

/// Every keyword as a clickable entry opening its popup.
pub fn keyword_index(catalog: &Catalog) -> Result<HtmlString, RenderError> {
    let mut items = HtmlString::empty();
    for (index, keyword) in catalog.keywords.iter().enumerate() {
        let onclick = format!("showPopup(event, '{}')", keyword_popup_href(index));
        let span = HtmlString::from_tag_with(
            "span",
            keyword.id.as_str(),
            &["class", "keyword", "onclick", &onclick],
        )?;
        items.append_tag("li", &span);
    }
    let mut html = HtmlString::from_text(&format!(
        "number of keywords: {}",
        catalog.keywords.len()
    ));
    if !items.is_empty() {
        html.append_tag("ul", &items);
    }
    Ok(html)
}

fn article_list(catalog: &Catalog, articles: &[ArticleId]) -> Result<HtmlString, RenderError> {
    let mut items = HtmlString::empty();
    for &id in articles {
        let article = &catalog.articles[id];
        let mut item = link_anchor(article.representative_link(), true)?;
        if let Some(date) = article.date {
            item.append_text(&format!(" ({})", date_to_text(date)?));
        }
        items.append_tag("li", &item);
    }
    Ok(wrap_list(items))
}

fn link_list(links: &[Link]) -> Result<HtmlString, RenderError> {
    let mut items = HtmlString::empty();
    for link in links {
        items.append_tag("li", &link_anchor(link, true)?);
    }
    Ok(wrap_list(items))
}

fn wrap_list(items: HtmlString) -> HtmlString {
    if items.is_empty() {
        items
    } else {
        HtmlString::from_tag("ul", &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawContent};
    use crate::{AdBookEntry, Article, Author, Keyword, MapNode};

    fn link(url: &str, title: &str) -> Link {
        Link {
            url: url.to_string(),
            title: title.to_string(),
            ..Link::default()
        }
    }

    fn ada() -> Author {
        Author {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            given_name: Some("Countess".to_string()),
            ..Author::default()
        }
    }

    fn catalog(adbook: Option<Vec<AdBookEntry>>) -> Catalog {
        normalize(RawContent {
            authors: vec![ada()],
            articles: vec![Article {
                links: vec![link("https://x.org", "Notes & Sketches")],
                date: Some(184309),
                author_indexes: Some(vec![0]),
                page: "notes.html".to_string(),
                ..Article::default()
            }],
            map: MapNode {
                title: "Notes".to_string(),
                page: Some("notes.html".to_string()),
                ..MapNode::default()
            },
            keywords: Some(vec![Keyword {
                id: "engine".to_string(),
                article_indexes: vec![0],
                ..Keyword::default()
            }]),
            adbook,
        })
        .unwrap()
    }

    #[test]
    fn author_popup_omits_empty_links_section() {
        let html = author_popup(&catalog(None), 0).unwrap().into_string();
        assert!(html.starts_with("<h1>Ada Lovelace &quot;Countess&quot;</h1>"));
        assert!(html.contains("<h2>Articles</h2>"));
        assert!(html.contains("Notes &amp; Sketches"));
        assert!(html.contains("(September 1843)"));
        assert!(!html.contains("<h2>Links</h2>"));
    }

    #[test]
    fn author_popup_lists_adbook_links() {
        let adbook = vec![AdBookEntry {
            author: ada(),
            links: vec![link("https://ada.example", "Homepage")],
        }];
        let html = author_popup(&catalog(Some(adbook)), 0).unwrap().into_string();
        assert!(html.contains("<h2>Links</h2><ul><li><a href=\"https://ada.example\""));
    }

    #[test]
    fn keyword_popup_and_index() {
        let catalog = catalog(None);
        let html = keyword_popup(&catalog, 0).unwrap().into_string();
        assert!(html.starts_with("<h1>engine</h1><h2>Articles</h2>"));

        let index = keyword_index(&catalog).unwrap().into_string();
        assert!(index.contains("showPopup(event, 'popup/keyword-0.html')"));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let catalog = catalog(None);
        assert!(matches!(
            author_popup(&catalog, 3),
            Err(RenderError::UnknownAuthor(3))
        ));
        assert!(matches!(
            keyword_popup(&catalog, 1),
            Err(RenderError::UnknownKeyword(1))
        ));
    }
}
