//! Sortable content tables: by article, by author, or by link.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::collate::{first_alphanumeric, first_alphanumeric_of_url, locale_cmp};
use crate::error::RenderError;
use crate::format::{date_to_html, duration_to_string, protection_to_html, status_to_html};
use crate::html::HtmlString;
use crate::{Article, ArticleId, Author, AuthorId, Catalog, Link};

const ANCHOR_LETTERS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUBTITLE_SEPARATOR: &str = " \u{2014} ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentSort {
    #[default]
    Article,
    Author,
    Link,
}

impl ContentSort {
    pub const ALL: [ContentSort; 3] = [Self::Article, Self::Author, Self::Link];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Author => "author",
            Self::Link => "link",
        }
    }

    /// Reads a `sort` query value; anything unknown falls back to the article view.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// File name of this view in the static site.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Article => "content.html",
            Self::Author => "content-author.html",
            Self::Link => "content-link.html",
        }
    }
}

impl FromStr for ContentSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Self::Article),
            "author" => Ok(Self::Author),
            "link" => Ok(Self::Link),
            other => Err(format!("unknown sort \"{}\"", other)),
        }
    }
}

impl fmt::Display for ContentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How header links reach another sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortLinks {
    /// `content.html?sort=<key>`, answered by the preview server.
    #[default]
    Query,
    /// One pre-rendered file per sort.
    Files,
}

impl SortLinks {
    pub fn href(self, sort: ContentSort) -> String {
        match self {
            Self::Query => format!("content.html?sort={}", sort),
            Self::Files => sort.file_name().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub page_prefix: String,
    pub sort_links: SortLinks,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_prefix: "../".to_string(),
            sort_links: SortLinks::default(),
        }
    }
}

impl RenderOptions {
    pub fn page_href(&self, page: &str) -> String {
        format!("{}{}", self.page_prefix, page)
    }
}

pub fn author_popup_href(author: AuthorId) -> String {
    format!("popup/author-{}.html", author)
}

pub fn keyword_popup_href(keyword: usize) -> String {
    format!("popup/keyword-{}.html", keyword)
}

/// Hands out `0`-`9`, `A`-`Z` anchors as rows pass them, each letter once.
#[derive(Debug, Clone)]
pub struct AnchorIndex {
    remaining: std::iter::Peekable<std::str::Chars<'static>>,
}

impl Default for AnchorIndex {
    fn default() -> Self {
        Self {
            remaining: ANCHOR_LETTERS.chars().peekable(),
        }
    }
}

impl AnchorIndex {
    /// Emits a `<span id="X">` for every unconsumed letter up to and including `initial`.
    pub fn advance(&mut self, initial: Option<char>) -> Result<HtmlString, RenderError> {
        let mut anchors = HtmlString::empty();
        let Some(initial) = initial else {
            return Ok(anchors);
        };
        let initial = initial.to_string();
        while let Some(&letter) = self.remaining.peek() {
            let letter = letter.to_string();
            if locale_cmp(&letter, &initial).is_gt() {
                break;
            }
            anchors.append_tag_with("span", "", &["id", &letter])?;
            self.remaining.next();
        }
        Ok(anchors)
    }
}

/// Row of `0`-`9`, `A`-`Z` links jumping to the anchors placed by [`AnchorIndex`].
pub fn letter_bar() -> Result<HtmlString, RenderError> {
    let mut cells = HtmlString::empty();
    for letter in ANCHOR_LETTERS.chars() {
        let letter = letter.to_string();
        let href = format!("#{}", letter);
        let link = HtmlString::from_tag_with("a", letter.as_str(), &["href", &href])?;
        cells.append_tag("td", &link);
    }
    let row = HtmlString::from_tag("tr", &cells);
    Ok(HtmlString::from_tag_with("table", &row, &["id", "navigationBar"])?)
}

/// The content table together with its active sort.
pub struct ContentView<'a> {
    catalog: &'a Catalog,
    options: &'a RenderOptions,
    sort: ContentSort,
}

impl<'a> ContentView<'a> {
    pub fn new(catalog: &'a Catalog, options: &'a RenderOptions, sort: ContentSort) -> Self {
        Self {
            catalog,
            options,
            sort,
        }
    }

    pub fn sort(&self) -> ContentSort {
        self.sort
    }

    /// Moves to `sort` and renders the whole table again.
    pub fn switch_sort(&mut self, sort: ContentSort) -> Result<HtmlString, RenderError> {
        self.sort = sort;
        self.render()
    }

    pub fn render(&self) -> Result<HtmlString, RenderError> {
        debug!(sort = %self.sort, "rendering content table");
        match self.sort {
            ContentSort::Article => self.render_by_article(),
            ContentSort::Author => self.render_by_author(),
            ContentSort::Link => self.render_by_link(),
        }
    }

    fn render_by_article(&self) -> Result<HtmlString, RenderError> {
        let mut anchors = AnchorIndex::default();
        let mut header = HtmlString::empty();
        header
            .append_tag("th", "title")
            .append_tag("th", &self.sort_header("authors", ContentSort::Author)?)
            .append_tag("th", "date")
            .append_tag("th", &self.sort_header("URL", ContentSort::Link)?)
            .append_tag("th", "language")
            .append_tag("th", "format")
            .append_tag("th", "duration")
            .append_tag("th", "referring page");
        let mut rows = HtmlString::from_tag("tr", &header);

        for (id, article) in self.catalog.articles.iter().enumerate() {
            let link = article.representative_link();
            let mut first = anchors.advance(first_alphanumeric(&link.title))?;
            first.append(&title_cell(link));

            let mut cells = HtmlString::from_tag("td", &first);
            cells
                .append_tag("td", &self.authors_cell(article, None)?)
                .append_tag("td", &date_cell(article)?)
                .append_tag("td", &urls_cell(article)?)
                .append_tag("td", &list_cell(&link.languages))
                .append_tag("td", &list_cell(&link.formats))
                .append_tag("td", &duration_cell(link)?)
                .append_tag("td", &self.referring_page_cell(id)?);
            rows.append_tag("tr", &cells);
        }

        let mut full = HtmlString::from_text(&format!(
            "number of articles: {}",
            self.catalog.articles.len()
        ));
        full.append_tag_with("table", &rows, &["class", "table"])?;
        Ok(full)
    }

    fn render_by_author(&self) -> Result<HtmlString, RenderError> {
        let mut anchors = AnchorIndex::default();
        let mut header = HtmlString::empty();
        header
            .append_tag("th", "authors")
            .append_tag("th", &self.sort_header("title", ContentSort::Article)?)
            .append_tag("th", "co-authors")
            .append_tag("th", "date")
            .append_tag("th", &self.sort_header("URL", ContentSort::Link)?)
            .append_tag("th", "language")
            .append_tag("th", "format")
            .append_tag("th", "duration")
            .append_tag("th", "referring page");
        let mut rows = HtmlString::from_tag("tr", &header);

        for (author_id, author) in self.catalog.authors.iter().enumerate() {
            for (position, &article_id) in author.articles.iter().enumerate() {
                let article = &self.catalog.articles[article_id];
                let link = article.representative_link();
                let mut cells = HtmlString::empty();
                if position == 0 {
                    let mut first = anchors.advance(author_initial(author))?;
                    first.append(&author_span(author_id, author)?);
                    cells.append_tag_with(
                        "td",
                        &first,
                        &["rowspan", &author.articles.len().to_string()],
                    )?;
                }
                cells
                    .append_tag("td", &title_cell(link))
                    .append_tag("td", &self.authors_cell(article, Some(author_id))?)
                    .append_tag("td", &date_cell(article)?)
                    .append_tag("td", &urls_cell(article)?)
                    .append_tag("td", &list_cell(&link.languages))
                    .append_tag("td", &list_cell(&link.formats))
                    .append_tag("td", &duration_cell(link)?)
                    .append_tag("td", &self.referring_page_cell(article_id)?);
                rows.append_tag("tr", &cells);
            }
        }

        let mut full = HtmlString::from_text(&format!(
            "number of authors: {}",
            self.catalog.authors.len()
        ));
        full.append_tag_with("table", &rows, &["class", "table"])?;
        Ok(full)
    }

    fn render_by_link(&self) -> Result<HtmlString, RenderError> {
        let mut anchors = AnchorIndex::default();
        let mut header = HtmlString::empty();
        header
            .append_tag("th", "URL")
            .append_tag("th", &self.sort_header("title", ContentSort::Article)?)
            .append_tag("th", &self.sort_header("authors", ContentSort::Author)?)
            .append_tag("th", "date")
            .append_tag("th", "language")
            .append_tag("th", "format")
            .append_tag("th", "duration")
            .append_tag("th", "referring page");
        let mut rows = HtmlString::from_tag("tr", &header);

        for &link_ref in &self.catalog.links {
            let link = self.catalog.link(link_ref);
            let article = &self.catalog.articles[link_ref.article];
            let mut first = anchors.advance(first_alphanumeric_of_url(&link.url))?;
            first.append(&link_anchor(link, false)?);

            let mut cells = HtmlString::from_tag("td", &first);
            cells
                .append_tag("td", &title_cell(link))
                .append_tag("td", &self.authors_cell(article, None)?)
                .append_tag("td", &date_cell(article)?)
                .append_tag("td", &list_cell(&link.languages))
                .append_tag("td", &list_cell(&link.formats))
                .append_tag("td", &duration_cell(link)?)
                .append_tag("td", &self.referring_page_cell(link_ref.article)?);
            rows.append_tag("tr", &cells);
        }

        let mut full =
            HtmlString::from_text(&format!("number of URLs: {}", self.catalog.links.len()));
        full.append_tag_with("table", &rows, &["class", "table"])?;
        Ok(full)
    }

    fn sort_header(&self, label: &str, target: ContentSort) -> Result<HtmlString, RenderError> {
        let span = HtmlString::from_tag_with("span", label, &["class", "linktitle"])?;
        Ok(HtmlString::from_tag_with(
            "a",
            &span,
            &["href", &self.options.sort_links.href(target), "style", "cursor: pointer"],
        )?)
    }

    /// Authors of `article`, one per line, leaving out `excluded`.
    fn authors_cell(
        &self,
        article: &Article,
        excluded: Option<AuthorId>,
    ) -> Result<HtmlString, RenderError> {
        let mut cell = HtmlString::empty();
        for &author_id in article.authors.iter().filter(|&&a| Some(a) != excluded) {
            if !cell.is_empty() {
                cell.append_empty_tag("br");
            }
            cell.append(&author_span(author_id, &self.catalog.authors[author_id])?);
        }
        Ok(cell)
    }

    fn referring_page_cell(&self, article: ArticleId) -> Result<HtmlString, RenderError> {
        let page = &self.catalog.articles[article].page;
        let info = self
            .catalog
            .pages
            .get(page)
            .ok_or_else(|| RenderError::UnknownPage(page.clone()))?;
        let span = HtmlString::from_tag_with("span", page.as_str(), &["class", "linktitle"])?;
        let title = format!(
            "language: {} | format: {}",
            info.languages.join(","),
            info.formats.join(",")
        );
        Ok(HtmlString::from_tag_with(
            "a",
            &span,
            &[
                "href",
                &self.options.page_href(page),
                "title",
                &title,
                "target",
                "_self",
            ],
        )?)
    }
}

/// Clickable author name opening the author popup.
pub fn author_span(id: AuthorId, author: &Author) -> Result<HtmlString, RenderError> {
    let onclick = format!("showPopup(event, '{}')", author_popup_href(id));
    Ok(HtmlString::from_tag_with(
        "span",
        author.display_name().as_str(),
        &["class", "author", "onclick", &onclick],
    )?)
}

fn author_initial(author: &Author) -> Option<char> {
    [&author.last_name, &author.given_name, &author.first_name]
        .into_iter()
        .flatten()
        .find_map(|name| first_alphanumeric(name))
}

fn title_text(link: &Link) -> String {
    match &link.subtitle {
        Some(subtitles) if !subtitles.is_empty() => format!(
            "{}{}{}",
            link.title,
            SUBTITLE_SEPARATOR,
            subtitles.join(SUBTITLE_SEPARATOR)
        ),
        _ => link.title.clone(),
    }
}

fn title_cell(link: &Link) -> HtmlString {
    HtmlString::from_text(&title_text(link))
}

fn date_cell(article: &Article) -> Result<HtmlString, RenderError> {
    match article.date {
        Some(date) => Ok(date_to_html(date)?),
        None => Ok(HtmlString::empty()),
    }
}

fn urls_cell(article: &Article) -> Result<HtmlString, RenderError> {
    let mut cell = HtmlString::empty();
    for (i, link) in article.links.iter().enumerate() {
        if i > 0 {
            cell.append_empty_tag("br");
        }
        cell.append(&link_anchor(link, false)?);
    }
    Ok(cell)
}

fn list_cell(values: &[String]) -> HtmlString {
    let mut cell = HtmlString::empty();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            cell.append_empty_tag("br");
        }
        cell.append_text(value);
    }
    cell
}

fn duration_cell(link: &Link) -> Result<HtmlString, RenderError> {
    match link.duration {
        Some(duration) => Ok(HtmlString::from_text(&duration_to_string(duration)?)),
        None => Ok(HtmlString::empty()),
    }
}

/// Anchor for `link` showing either its URL or its title, followed by status and
/// protection glyphs.
pub fn link_anchor(link: &Link, show_title: bool) -> Result<HtmlString, RenderError> {
    let text = if show_title {
        title_text(link)
    } else {
        link.url.clone()
    };
    let mut title = format!(
        "language: {} | format: {}",
        link.languages.join(" "),
        link.formats.join(" ")
    );
    if let Some(duration) = link.duration {
        title.push_str(&format!(" | duration: {}", duration_to_string(duration)?));
    }
    let target = if link.url.starts_with("javascript:") {
        "_self"
    } else {
        "_blank"
    };
    let span = HtmlString::from_tag_with("span", text.as_str(), &["class", "articletitle"])?;
    let mut html = HtmlString::from_tag_with(
        "a",
        &span,
        &["href", &link.url, "title", &title, "target", target],
    )?;
    if let Some(status) = &link.status {
        html.append(&status_to_html(status)?);
    }
    if let Some(protection) = &link.protection {
        html.append(&protection_to_html(protection)?);
    }
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawContent};
    use crate::{FormatError, MapNode};

    fn link(url: &str, title: &str) -> Link {
        Link {
            url: url.to_string(),
            title: title.to_string(),
            languages: vec!["en".to_string()],
            formats: vec!["HTML".to_string()],
            ..Link::default()
        }
    }

    fn build_catalog(articles: Vec<Article>) -> Catalog {
        let raw = RawContent {
            authors: vec![
                Author {
                    first_name: Some("Ada".to_string()),
                    last_name: Some("Lovelace".to_string()),
                    ..Author::default()
                },
                Author {
                    first_name: Some("Charles".to_string()),
                    last_name: Some("Babbage".to_string()),
                    ..Author::default()
                },
            ],
            articles,
            map: MapNode {
                title: "root".to_string(),
                children: Some(vec![MapNode {
                    title: "Notes".to_string(),
                    page: Some("notes.html".to_string()),
                    languages: vec!["en".to_string()],
                    formats: vec!["HTML".to_string()],
                    ..MapNode::default()
                }]),
                ..MapNode::default()
            },
            keywords: None,
            adbook: None,
        };
        normalize(raw).unwrap()
    }

    fn article(links: Vec<Link>, authors: &[usize]) -> Article {
        Article {
            links,
            date: Some(18430901),
            author_indexes: Some(authors.to_vec()),
            page: "notes.html".to_string(),
            ..Article::default()
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn sort_from_query_defaults_to_article() {
        assert_eq!(ContentSort::from_query(Some("author")), ContentSort::Author);
        assert_eq!(ContentSort::from_query(Some("link")), ContentSort::Link);
        assert_eq!(ContentSort::from_query(Some("bogus")), ContentSort::Article);
        assert_eq!(ContentSort::from_query(None), ContentSort::Article);
    }

    #[test]
    fn sort_links_point_at_query_or_file() {
        assert_eq!(
            SortLinks::Query.href(ContentSort::Author),
            "content.html?sort=author"
        );
        assert_eq!(SortLinks::Files.href(ContentSort::Link), "content-link.html");
        assert_eq!(SortLinks::Files.href(ContentSort::Article), "content.html");
    }

    #[test]
    fn anchors_are_emitted_once_in_order() {
        let mut index = AnchorIndex::default();
        let first = index.advance(Some('2')).unwrap();
        assert_eq!(
            first.as_str(),
            "<span id=\"0\"></span><span id=\"1\"></span><span id=\"2\"></span>"
        );
        assert!(index.advance(Some('2')).unwrap().is_empty());
        assert!(index.advance(None).unwrap().is_empty());
        let next = index.advance(Some('B')).unwrap();
        assert_eq!(count(next.as_str(), "<span id="), 9);
        assert!(next.as_str().ends_with("<span id=\"B\"></span>"));
    }

    #[test]
    fn accented_initial_takes_only_its_base_letter() {
        let mut index = AnchorIndex::default();
        let ecole = index.advance(first_alphanumeric("École")).unwrap();
        assert!(ecole.as_str().ends_with("<span id=\"E\"></span>"));
        assert!(!ecole.as_str().contains("id=\"F\""));
        let zeta = index.advance(first_alphanumeric("Zeta")).unwrap();
        assert_eq!(count(zeta.as_str(), "<span id="), 21);
        assert!(zeta.as_str().starts_with("<span id=\"F\"></span>"));
    }

    #[test]
    fn letter_bar_links_every_anchor() {
        let bar = letter_bar().unwrap();
        let bar = bar.as_str();
        assert!(bar.starts_with("<table id=\"navigationBar\"><tr><td><a href=\"#0\">0</a></td>"));
        assert!(bar.contains("<td><a href=\"#A\">A</a></td>"));
        assert!(bar.ends_with("<td><a href=\"#Z\">Z</a></td></tr></table>"));
        assert_eq!(count(bar, "<td>"), 36);
    }

    #[test]
    fn article_table_has_one_row_per_article() {
        let catalog = build_catalog(vec![
            article(vec![link("https://x.org", "Notes")], &[0, 1]),
            article(vec![link("https://y.org", "Sketch")], &[1]),
        ]);
        let options = RenderOptions::default();
        let html = ContentView::new(&catalog, &options, ContentSort::Article)
            .render()
            .unwrap()
            .into_string();
        assert!(html.starts_with("number of articles: 2<table class=\"table\">"));
        assert_eq!(count(&html, "<tr>"), 3);
        assert!(html.contains("Ada Lovelace</span><br><span class=\"author\""));
        assert!(html.contains("September 1<sup>st</sup>, 1843"));
        assert!(html.contains("href=\"../notes.html\""));
        assert!(html.contains("title=\"language: en | format: HTML\""));
        assert!(html.contains("<span id=\"N\"></span>Notes"));
    }

    #[test]
    fn author_table_spans_rows_and_skips_self_from_coauthors() {
        let catalog = build_catalog(vec![
            article(vec![link("https://x.org", "Notes")], &[0, 1]),
            article(vec![link("https://y.org", "Sketch")], &[0]),
        ]);
        let options = RenderOptions::default();
        let html = ContentView::new(&catalog, &options, ContentSort::Author)
            .render()
            .unwrap()
            .into_string();
        assert!(html.contains("<td rowspan=\"2\">"));
        assert!(html.contains("<td rowspan=\"1\">"));
        // Babbage appears as Ada's co-author once, and as row author once
        assert_eq!(count(&html, "Charles Babbage"), 2);
        assert_eq!(count(&html, "Ada Lovelace"), 2);
    }

    #[test]
    fn link_table_lists_every_link() {
        let mut second = link("https://b.org/old", "Old");
        second.status = Some("dead".to_string());
        second.protection = Some("free_registration".to_string());
        second.duration = Some(61);
        let catalog = build_catalog(vec![article(
            vec![link("https://a.org", "Notes"), second],
            &[0],
        )]);
        let options = RenderOptions {
            sort_links: SortLinks::Files,
            ..RenderOptions::default()
        };
        let html = ContentView::new(&catalog, &options, ContentSort::Link)
            .render()
            .unwrap()
            .into_string();
        assert!(html.starts_with("number of URLs: 2"));
        assert!(html.contains("title=\"dead link\""));
        assert!(html.contains("title=\"free registration required\""));
        assert!(html.contains("| duration: 1m 1s"));
        assert!(html.contains("<td>1m 1s</td>"));
        assert!(html.contains("href=\"content-author.html\""));
    }

    #[test]
    fn switching_sort_rerenders_idempotently() {
        let catalog = build_catalog(vec![article(vec![link("https://x.org", "Notes")], &[0])]);
        let options = RenderOptions::default();
        let mut view = ContentView::new(&catalog, &options, ContentSort::Article);
        let by_author = view.switch_sort(ContentSort::Author).unwrap();
        assert_eq!(view.sort(), ContentSort::Author);
        assert_eq!(view.switch_sort(ContentSort::Author).unwrap(), by_author);
        assert_ne!(view.switch_sort(ContentSort::Link).unwrap(), by_author);
    }

    #[test]
    fn malformed_link_data_fails_fast() {
        let mut bad = link("https://x.org", "Notes");
        bad.status = Some("lost".to_string());
        let catalog = build_catalog(vec![article(vec![bad], &[0])]);
        let options = RenderOptions::default();
        let err = ContentView::new(&catalog, &options, ContentSort::Article)
            .render()
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Format(FormatError::UnknownStatus(_))
        ));

        let mut long = link("https://x.org", "Notes");
        long.duration = Some(86400);
        let catalog = build_catalog(vec![article(vec![long], &[0])]);
        let err = ContentView::new(&catalog, &options, ContentSort::Link)
            .render()
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Format(FormatError::InvalidDuration(86400))
        ));
    }

    #[test]
    fn unknown_referring_page_is_an_error() {
        let mut stray = article(vec![link("https://x.org", "Notes")], &[0]);
        stray.page = "gone.html".to_string();
        let catalog = build_catalog(vec![stray]);
        let options = RenderOptions::default();
        let err = ContentView::new(&catalog, &options, ContentSort::Article)
            .render()
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownPage(p) if p == "gone.html"));
    }

    #[test]
    fn subtitles_join_with_em_dash() {
        let mut l = link("https://x.org", "Main");
        l.subtitle = Some(vec!["Part 1".to_string(), "Intro".to_string()]);
        assert_eq!(title_text(&l), "Main \u{2014} Part 1 \u{2014} Intro");
        let anchor = link_anchor(&l, true).unwrap();
        assert!(anchor.as_str().contains("Main \u{2014} Part 1"));
        assert!(anchor.as_str().contains("target=\"_blank\""));
    }
}
