#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const AUTHORS: &str = r#"{"authors": [{"firstName": "Ada", "lastName": "Lovelace"}]}"#;

pub const ARTICLES: &str = r#"{
    "articles": [
        {
            "links": [
                {"url": "https://x.org", "title": "Notes", "languages": ["en"], "formats": ["HTML"]}
            ],
            "authorIndexes": [0],
            "page": "notes/index.html"
        }
    ]
}"#;

pub const MAP: &str = r#"{
    "root": {
        "title": "Home",
        "children": [
            {"title": "Notes", "page": "notes/index.html", "languages": ["en"], "formats": ["HTML"]}
        ]
    }
}"#;

pub const KEYWORDS: &str = r#"{"keywords": [{"id": "analytical engine", "articleIndexes": [0]}]}"#;

/// Writes the three required fixtures.
pub fn write_required(dir: &Path) {
    fs::write(dir.join("author.json"), AUTHORS).unwrap();
    fs::write(dir.join("article.json"), ARTICLES).unwrap();
    fs::write(dir.join("map.json"), MAP).unwrap();
}

pub fn write_keywords(dir: &Path) {
    fs::write(dir.join("keyword.json"), KEYWORDS).unwrap();
}
