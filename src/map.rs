//! Collapsible site map.

use crate::error::RenderError;
use crate::html::HtmlString;
use crate::MapNode;

const INDENT: &str = "\u{00A0}\u{00A0}\u{00A0}\u{00A0}";
pub const TOGGLE_ID_PREFIX: &str = "toggleDiv";
pub const CONTAINER_ID_PREFIX: &str = "spanDiv";

/// Visibility of one node's children. Each node flips on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_open(open: bool) -> Self {
        if open {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Visible => "\u{25BC}",
            Self::Hidden => "\u{25B6}",
        }
    }

    pub fn css_display(self) -> &'static str {
        match self {
            Self::Visible => "initial",
            Self::Hidden => "none",
        }
    }
}

/// Marks `node` open when it is `target` or has an open descendant. Returns the flag.
pub fn init_open_state(node: &mut MapNode, target: Option<&str>) -> bool {
    let mut child_open = false;
    for child in node.children.iter_mut().flatten() {
        child_open |= init_open_state(child, target);
    }
    node.open = child_open || (target.is_some() && node.page.as_deref() == target);
    node.open
}

pub struct MapRenderer {
    counter: usize,
    target: Option<String>,
    page_prefix: String,
}

impl MapRenderer {
    pub fn new(target: Option<String>, page_prefix: impl Into<String>) -> Self {
        Self {
            counter: 0,
            target,
            page_prefix: page_prefix.into(),
        }
    }

    /// Computes open state for the target page, then renders from `root`.
    pub fn render_tree(mut self, root: &MapNode) -> Result<HtmlString, RenderError> {
        let mut root = root.clone();
        init_open_state(&mut root, self.target.as_deref());
        self.render(&root, 0)
    }

    /// Renders `node` and its subtree; open flags must already be set.
    pub fn render(&mut self, node: &MapNode, depth: usize) -> Result<HtmlString, RenderError> {
        let mut html = HtmlString::empty();
        for _ in 0..depth {
            html.append_text(INDENT);
        }

        match &node.page {
            None => {
                html.append_text(&node.title);
            }
            Some(page) => {
                let title = format!(
                    "language: {} | format: {}",
                    node.languages.join(","),
                    node.formats.join(",")
                );
                let href = format!("{}{}", self.page_prefix, page);
                let mut attributes = vec![
                    "href",
                    href.as_str(),
                    "title",
                    title.as_str(),
                    "target",
                    "_self",
                ];
                if self.target.as_deref() == Some(page.as_str()) {
                    attributes.extend(["style", "font-weight: bold"]);
                }
                html.append_tag_with("a", node.title.as_str(), &attributes)?;
            }
        }

        let Some(children) = &node.children else {
            html.append_empty_tag("br");
            return Ok(html);
        };

        let counter = self.counter;
        self.counter += 1;
        let visibility = Visibility::from_open(node.open);
        let onclick = format!("toggleMapNode({})", counter);
        let toggle_id = format!("{}{}", TOGGLE_ID_PREFIX, counter);
        html.append_tag_with(
            "a",
            visibility.glyph(),
            &["onclick", &onclick, "id", &toggle_id, "style", "cursor: pointer"],
        )?;
        html.append_empty_tag("br");

        let mut inner = HtmlString::empty();
        for child in children {
            inner.append(&self.render(child, depth + 1)?);
        }
        let container_id = format!("{}{}", CONTAINER_ID_PREFIX, counter);
        let style = format!("display: {}", visibility.css_display());
        html.append_tag_with("span", &inner, &["id", &container_id, "style", &style])?;
        Ok(html)
    }
}
