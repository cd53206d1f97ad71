//! Mention/Link Annotation
//!
//! Turns raw user-authored text (status-update bodies) into a safe markup
//! fragment: `http(s)://` URLs become anchors, `@mention` tokens become
//! person links (or styled spans when the name resolves to nobody), and
//! everything else is escaped literal text.
//!
//! Processing order matters: the URL pass runs first over the raw text;
//! the mention pass then runs only over the literal spans left between
//! generated elements. Mention matching therefore operates on raw
//! characters (names are escaped once, at token-emission time), and
//! tokens inside already-linkified URL text are never re-processed.
//!
//! The routine is total: it never fails. Unresolvable mentions render as
//! non-link spans, unparseable URLs fall back to full-URL labels, and an
//! unmatched `@` is ordinary text.

use crate::text::fragment::MarkupFragment;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// URLs run from a scheme to the first whitespace or `"` character.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s"]+"#).unwrap());

/// Mention grammar. Alternation order matters: the quoted form
/// `@"Full Name"` (spaces allowed, no embedded quote) is tried before the
/// unquoted form, which captures one word or exactly two space-separated
/// words - never a third.
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@"([^"\n]+)"|@(\w+(?: \w+)?)"#).unwrap());

/// File extensions whose URLs display as a bare filename instead of the
/// full URL.
const LINKED_FILE_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "txt", "md", "csv",
    // media
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico", "mp3", "wav", "mp4", "mov",
    "avi", "webm",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar",
    // code
    "rs", "py", "js", "ts", "java", "c", "h", "cpp", "go", "rb", "sh", "sql", "json",
    "yaml", "yml", "toml", "patch", "diff",
];

/// A person record as seen by the annotator: display name, identifier,
/// and a resolvable detail-view URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRef {
    /// Person identifier
    pub id: String,

    /// Display name
    pub name: String,
}

impl PersonRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Relative URL of this person's detail view
    pub fn detail_url(&self) -> String {
        format!("/people/{}", self.id)
    }
}

/// Person-name resolution capability injected into the annotator.
///
/// Implementations must match case-insensitively and exactly (the given
/// name is already trimmed). Lookups never fail the annotation - a miss
/// simply renders the mention as a non-link span.
pub trait PersonLookup {
    /// Return the person whose name equals `name` (case-insensitive), if any.
    fn person_by_name(&self, name: &str) -> Option<PersonRef>;
}

/// Any closure from name to optional person works as a lookup, which keeps
/// unit tests free of store setup.
impl<F> PersonLookup for F
where
    F: Fn(&str) -> Option<PersonRef>,
{
    fn person_by_name(&self, name: &str) -> Option<PersonRef> {
        self(name)
    }
}

/// Annotate raw text into a markup fragment safe to embed in an HTML
/// document.
///
/// # Examples
///
/// ```
/// use taskmaster_core::text::{annotate, PersonRef};
///
/// let lookup = |name: &str| {
///     (name.eq_ignore_ascii_case("Jane Smith")).then(|| PersonRef::new("p1", "Jane Smith"))
/// };
/// let html = annotate(r#"@"Jane Smith" shipped it"#, &lookup).to_html();
/// assert_eq!(
///     html,
///     r#"<a href="/people/p1" class="mention">@Jane Smith</a> shipped it"#
/// );
/// ```
pub fn annotate(raw: &str, lookup: &dyn PersonLookup) -> MarkupFragment {
    let mut fragment = MarkupFragment::new();
    let mut cursor = 0;
    for url in URL_RE.find_iter(raw) {
        append_with_mentions(&mut fragment, &raw[cursor..url.start()], lookup);
        fragment.push_markup(render_url(url.as_str()));
        cursor = url.end();
    }
    append_with_mentions(&mut fragment, &raw[cursor..], lookup);
    fragment
}

/// Resolve the persons referenced by @mention tokens in `raw`,
/// deduplicated, in order of first appearance.
///
/// Shares the mention grammar with [`annotate`], including the rule that
/// tokens inside URL spans do not count.
pub fn extract_mentions(raw: &str, lookup: &dyn PersonLookup) -> Vec<PersonRef> {
    let mut seen = HashSet::new();
    let mut mentions = Vec::new();
    let mut cursor = 0;
    for url in URL_RE.find_iter(raw) {
        collect_mentions(&raw[cursor..url.start()], lookup, &mut seen, &mut mentions);
        cursor = url.end();
    }
    collect_mentions(&raw[cursor..], lookup, &mut seen, &mut mentions);
    mentions
}

/// Run the mention pass over one literal span, pushing text and mention
/// elements onto the fragment.
fn append_with_mentions(fragment: &mut MarkupFragment, text: &str, lookup: &dyn PersonLookup) {
    let mut cursor = 0;
    for caps in MENTION_RE.captures_iter(text) {
        let token = caps.get(0).expect("match has a whole-pattern group");
        fragment.push_text(&text[cursor..token.start()]);
        fragment.push_markup(render_mention(captured_name(&caps), lookup));
        cursor = token.end();
    }
    fragment.push_text(&text[cursor..]);
}

fn collect_mentions(
    text: &str,
    lookup: &dyn PersonLookup,
    seen: &mut HashSet<String>,
    mentions: &mut Vec<PersonRef>,
) {
    for caps in MENTION_RE.captures_iter(text) {
        if let Some(person) = lookup.person_by_name(captured_name(&caps)) {
            if seen.insert(person.id.clone()) {
                mentions.push(person);
            }
        }
    }
}

/// The trimmed name captured by either mention form.
fn captured_name<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|group| group.as_str())
        .unwrap_or("")
        .trim()
}

/// Build the anchor element for one URL.
fn render_url(url: &str) -> String {
    let label = url_label(url);
    format!(
        r#"<a href="{}">{}</a>"#,
        html_escape::encode_double_quoted_attribute(url),
        html_escape::encode_text(&label)
    )
}

/// Build the inline element for one mention token: a link when the name
/// resolves, a plain styled span otherwise.
fn render_mention(name: &str, lookup: &dyn PersonLookup) -> String {
    let display = html_escape::encode_text(name);
    match lookup.person_by_name(name) {
        Some(person) => format!(
            r#"<a href="{}" class="mention">@{}</a>"#,
            html_escape::encode_double_quoted_attribute(&person.detail_url()),
            display
        ),
        None => format!(r#"<span class="mention">@{}</span>"#, display),
    }
}

/// Visible text for a URL anchor: the percent-decoded filename when the
/// path ends in a recognized extension, otherwise the full URL. Any
/// parse or decode failure falls back to the full URL.
fn url_label(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => file_name_label(&url).unwrap_or_else(|| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

fn file_name_label(url: &Url) -> Option<String> {
    let last = url.path_segments()?.last()?;
    if last.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(last).decode_utf8().ok()?;
    let (_, extension) = decoded.rsplit_once('.')?;
    LINKED_FILE_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
        .then(|| decoded.into_owned())
}
