//! Typed Markup Fragments
//!
//! A `MarkupFragment` is an ordered sequence of typed segments: literal
//! text (escaped at serialization time) interleaved with trusted markup
//! elements the annotator itself generated (emitted verbatim). Building
//! output this way means generated elements are never re-parsed or
//! re-escaped, and every literal character is escaped exactly once.

use serde::Serialize;

/// One span of annotator output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Segment {
    /// Literal text from the input, stored raw, escaped on serialization
    Text(String),

    /// A trusted markup element generated by the annotator; its interior
    /// was escaped when the element was built
    Markup(String),
}

/// A snippet of markup intended for embedding into a larger document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MarkupFragment {
    segments: Vec<Segment>,
}

impl MarkupFragment {
    /// Create an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal-text segment (empty spans are dropped)
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.segments.push(Segment::Text(text));
        }
    }

    /// Append a trusted markup segment
    pub fn push_markup(&mut self, markup: impl Into<String>) {
        self.segments.push(Segment::Markup(markup.into()));
    }

    /// The typed segments, in document order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the fragment holds no segments at all
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Serialize to an HTML string, escaping literal segments and passing
    /// trusted markup through untouched.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => html.push_str(&html_escape::encode_text(text)),
                Segment::Markup(markup) => html.push_str(markup),
            }
        }
        html
    }
}

impl std::fmt::Display for MarkupFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_segments_are_escaped() {
        let mut fragment = MarkupFragment::new();
        fragment.push_text("a < b & c");
        assert_eq!(fragment.to_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_markup_segments_pass_through() {
        let mut fragment = MarkupFragment::new();
        fragment.push_markup(r#"<a href="/x">link</a>"#);
        assert_eq!(fragment.to_html(), r#"<a href="/x">link</a>"#);
    }

    #[test]
    fn test_segments_interleave_in_order() {
        let mut fragment = MarkupFragment::new();
        fragment.push_text("see ");
        fragment.push_markup("<span>tag</span>");
        fragment.push_text(" & more");
        assert_eq!(fragment.to_html(), "see <span>tag</span> &amp; more");
    }

    #[test]
    fn test_empty_text_spans_are_dropped() {
        let mut fragment = MarkupFragment::new();
        fragment.push_text("");
        assert!(fragment.is_empty());
        assert_eq!(fragment.to_html(), "");
    }

    #[test]
    fn test_escaping_is_applied_once() {
        let mut fragment = MarkupFragment::new();
        fragment.push_text("&amp;");
        // The literal input "&amp;" escapes to "&amp;amp;" - the original
        // ampersand character is escaped exactly once.
        assert_eq!(fragment.to_html(), "&amp;amp;");
    }
}
