use html_scraper::{ElementRef, Html};

/// Elements whose boundaries separate words in the rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "caption",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Elements whose text content is never part of the article body.
const SKIP_TAGS: &[&str] = &["script", "style", "template", "noscript"];

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

fn is_skipped(name: &str) -> bool {
    SKIP_TAGS.contains(&name)
}

/// Collapse every whitespace run to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup and decode entities, keeping the raw text layout.
///
/// Parsing is HTML5-permissive: unbalanced or unknown tags are dropped, unknown entities are
/// left as written.
pub fn strip_markup(source: &str) -> String {
    let fragment = Html::parse_fragment(source);
    let mut out = String::with_capacity(source.len());
    push_text(fragment.root_element(), &mut out);
    out
}

// Blocks emit a separator on open and on close.
fn push_text(elem: ElementRef<'_>, out: &mut String) {
    for child in elem.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if is_skipped(name) {
            continue;
        }
        let block = is_block(name);
        if block {
            out.push(' ');
        }
        push_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

/// Marked-up source text to one line of plain text.
pub fn normalize(source: &str) -> String {
    if source.trim().is_empty() {
        return String::new();
    }
    collapse_whitespace(&strip_markup(source))
}
