use std::fmt;

use crate::error::HtmlError;

/// An HTML fragment under construction.
///
/// Text is escaped exactly once, when it is inserted. Fragments are spliced in
/// verbatim, so nesting a built fragment never escapes it a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlString {
    html: String,
}

/// Anything that can be placed inside a tag: raw text (escaped) or a fragment (as-is).
pub trait ToHtml {
    fn push_html(&self, out: &mut String);
}

impl ToHtml for str {
    fn push_html(&self, out: &mut String) {
        out.push_str(&escape(self));
    }
}

impl ToHtml for String {
    fn push_html(&self, out: &mut String) {
        self.as_str().push_html(out);
    }
}

impl ToHtml for HtmlString {
    fn push_html(&self, out: &mut String) {
        out.push_str(&self.html);
    }
}

impl<T: ToHtml + ?Sized> ToHtml for &T {
    fn push_html(&self, out: &mut String) {
        (**self).push_html(out);
    }
}

impl HtmlString {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut that = Self::empty();
        that.append_text(text);
        that
    }

    pub fn from_tag<C: ToHtml + ?Sized>(tag: &str, content: &C) -> Self {
        let mut that = Self::empty();
        that.append_tag(tag, content);
        that
    }

    /// Builds `<tag a1="v1" ...>content</tag>`.
    ///
    /// `attributes` is a flat `name, value, name, value, ...` slice; an odd length is a
    /// caller error.
    pub fn from_tag_with<C: ToHtml + ?Sized>(
        tag: &str,
        content: &C,
        attributes: &[&str],
    ) -> Result<Self, HtmlError> {
        let mut that = Self::empty();
        that.append_tag_with(tag, content, attributes)?;
        Ok(that)
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        text.push_html(&mut self.html);
        self
    }

    pub fn append(&mut self, fragment: &HtmlString) -> &mut Self {
        self.html.push_str(&fragment.html);
        self
    }

    /// Appends a void element such as `<br>`.
    pub fn append_empty_tag(&mut self, tag: &str) -> &mut Self {
        self.html.push('<');
        self.html.push_str(tag);
        self.html.push('>');
        self
    }

    pub fn append_tag<C: ToHtml + ?Sized>(&mut self, tag: &str, content: &C) -> &mut Self {
        self.push_element(tag, content, &[]);
        self
    }

    pub fn append_tag_with<C: ToHtml + ?Sized>(
        &mut self,
        tag: &str,
        content: &C,
        attributes: &[&str],
    ) -> Result<&mut Self, HtmlError> {
        if attributes.len() % 2 != 0 {
            return Err(HtmlError::InvalidArgument {
                tag: tag.to_string(),
                count: attributes.len(),
            });
        }
        self.push_element(tag, content, attributes);
        Ok(self)
    }

    fn push_element<C: ToHtml + ?Sized>(&mut self, tag: &str, content: &C, attributes: &[&str]) {
        self.html.push('<');
        self.html.push_str(tag);
        for pair in attributes.chunks_exact(2) {
            self.html.push(' ');
            self.html.push_str(pair[0]);
            self.html.push_str("=\"");
            self.html.push_str(&escape_attribute_value(pair[1]));
            self.html.push('"');
        }
        self.html.push('>');
        content.push_html(&mut self.html);
        self.html.push_str("</");
        self.html.push_str(tag);
        self.html.push('>');
    }
}

impl fmt::Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl From<HtmlString> for String {
    fn from(value: HtmlString) -> Self {
        value.html
    }
}

// Ampersand goes first so the entities produced below are left alone.
pub fn escape(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

fn escape_attribute_value(value: &str) -> String {
    value.replace('"', "&quot;")
}
