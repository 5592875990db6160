//! Orderings shared by the normalizer and the table renderer.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::format::DateParts;
use crate::Article;

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme pattern"));

/// Letters without accents or case.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Collation in three levels: base letters, then accents, then case (lowercase first).
/// `É` therefore sorts between `E` and `F`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| b.cmp(a))
}

pub fn strip_scheme(url: &str) -> &str {
    match SCHEME.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

pub fn compare_urls(u1: &str, u2: &str) -> Ordering {
    locale_cmp(strip_scheme(u1), strip_scheme(u2))
}

/// Year, then zero-padded month and day when present. Dates that cannot be decoded
/// keep their digits so the order stays total.
pub fn date_sort_key(date: i64) -> String {
    match DateParts::decode(date) {
        Ok(parts) => parts.sort_key(),
        Err(_) => date.to_string(),
    }
}

/// Undated articles first, then ascending date key, then representative title.
pub fn compare_articles_by_date(a1: &Article, a2: &Article) -> Ordering {
    let by_date = match (a1.date, a2.date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(d1), Some(d2)) => date_sort_key(d1).cmp(&date_sort_key(d2)),
    };
    by_date.then_with(|| {
        locale_cmp(
            &a1.representative_link().title,
            &a2.representative_link().title,
        )
    })
}

/// Upper-cased first letter or decimal digit, used to place alphabetic anchors.
pub fn first_alphanumeric(text: &str) -> Option<char> {
    text.chars()
        .find(|c| c.is_alphabetic() || c.to_digit(10).is_some())
        .and_then(|c| c.to_uppercase().next())
}

/// Relative URLs do not take part in the anchor index.
pub fn first_alphanumeric_of_url(url: &str) -> Option<char> {
    if url.starts_with("../") {
        return None;
    }
    first_alphanumeric(strip_scheme(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Link;

    fn article(title: &str, date: Option<i64>) -> Article {
        Article {
            links: vec![Link {
                url: format!("https://example.org/{}", title),
                title: title.to_string(),
                ..Link::default()
            }],
            date,
            page: "page.html".to_string(),
            ..Article::default()
        }
    }

    #[test]
    fn locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn accents_sort_with_their_base_letter() {
        assert_eq!(locale_cmp("Élise", "Zeta"), Ordering::Less);
        assert_eq!(locale_cmp("École", "Ecole"), Ordering::Greater);
        assert_eq!(locale_cmp("École", "Fable"), Ordering::Less);
        assert_eq!(locale_cmp("E", "É"), Ordering::Less);
        assert_eq!(locale_cmp("F", "É"), Ordering::Greater);
        assert_eq!(locale_cmp("élan", "Élan"), Ordering::Less);
    }

    #[test]
    fn scheme_is_stripped_before_comparing_urls() {
        assert_eq!(strip_scheme("https://zzz.com/a"), "zzz.com/a");
        assert_eq!(strip_scheme("../local.html"), "../local.html");
        assert_eq!(
            compare_urls("https://zzz.com/a", "http://aaa.com/b"),
            Ordering::Greater
        );
    }

    #[test]
    fn undated_articles_sort_first() {
        let undated = article("Zzz", None);
        let dated = article("Aaa", Some(1999));
        assert_eq!(compare_articles_by_date(&undated, &dated), Ordering::Less);
        assert_eq!(compare_articles_by_date(&dated, &undated), Ordering::Greater);
    }

    #[test]
    fn same_date_falls_back_to_title() {
        let a = article("alpha", Some(20010203));
        let b = article("Beta", Some(20010203));
        assert_eq!(compare_articles_by_date(&a, &b), Ordering::Less);
        assert_eq!(compare_articles_by_date(&b, &a), Ordering::Greater);
    }

    #[test]
    fn dates_compare_by_padded_components() {
        let year_only = article("x", Some(2001));
        let month = article("x", Some(200102));
        let day = article("x", Some(20010115));
        let later = article("x", Some(2002));
        assert_eq!(compare_articles_by_date(&year_only, &month), Ordering::Less);
        assert_eq!(compare_articles_by_date(&day, &month), Ordering::Less);
        assert_eq!(compare_articles_by_date(&month, &later), Ordering::Less);
    }

    #[test]
    fn first_alphanumeric_skips_punctuation() {
        assert_eq!(first_alphanumeric("  \"quoted\""), Some('Q'));
        assert_eq!(first_alphanumeric("42 things"), Some('4'));
        assert_eq!(first_alphanumeric("..."), None);
        assert_eq!(first_alphanumeric("½ price"), Some('P'));
        assert_eq!(first_alphanumeric("²nd"), Some('N'));
        assert_eq!(first_alphanumeric("école"), Some('É'));
        assert_eq!(first_alphanumeric_of_url("https://www.x.org"), Some('W'));
        assert_eq!(first_alphanumeric_of_url("../page.html"), None);
    }
}
