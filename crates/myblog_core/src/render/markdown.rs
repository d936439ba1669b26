//! Markdown-like renderer for post content.
//!
//! # Responsibility
//! - Strip embedded markup, escape what remains, then build HTML from a
//!   small line-oriented syntax subset.
//!
//! # Invariants
//! - Block structure is decided per line before any inline substitution, so
//!   emphasis never crosses a tag inserted for a block.
//! - Code span content is emitted verbatim (already escaped) and never
//!   receives emphasis.
//!
//! Supported subset: `` `code` ``, `**bold**`, `*italic*`, `#`/`##`/`###`
//! headings, `-`/`*` list items, blank-line separated paragraphs. Nested
//! lists, links and overlapping emphasis are not handled.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static BLOCK_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("valid block split regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,3})\s(.+)$").expect("valid heading regex"));
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s(.+)$").expect("valid list item regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));

/// CSS class attributes applied to generated tags.
///
/// An empty string emits the bare tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTheme {
    pub code: &'static str,
    pub h1: &'static str,
    pub h2: &'static str,
    pub h3: &'static str,
    pub ul: &'static str,
    pub p: &'static str,
}

impl MarkupTheme {
    /// Theme without any class attributes.
    pub const fn plain() -> Self {
        Self {
            code: "",
            h1: "",
            h2: "",
            h3: "",
            ul: "",
            p: "",
        }
    }
}

impl Default for MarkupTheme {
    fn default() -> Self {
        Self {
            code: "px-1 py-0.5 rounded bg-gray-100 border",
            h1: "text-2xl font-extrabold mt-8",
            h2: "text-xl font-bold mt-6",
            h3: "text-lg font-semibold mt-4",
            ul: "list-disc list-inside my-3",
            p: "my-3 leading-7",
        }
    }
}

/// Removes every angle-bracket tag sequence from `text`.
pub fn sanitize(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Renders `text` with the default theme.
pub fn render_markdown(text: &str) -> String {
    render_markdown_with(text, &MarkupTheme::default())
}

/// Renders `text` with the given theme.
pub fn render_markdown_with(text: &str, theme: &MarkupTheme) -> String {
    let normalized = text.replace("\r\n", "\n");
    let safe = escape_html(&sanitize(&normalized));

    BLOCK_SPLIT_RE
        .split(&safe)
        .filter(|block| !block.trim().is_empty())
        .map(|block| render_block(block, theme))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rendered preview for editor content, `None` when there is nothing to show.
pub fn preview(content: &str) -> Option<String> {
    if content.trim().is_empty() {
        None
    } else {
        Some(render_markdown(content))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading(usize, &'a str),
    ListItem(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = HEADING_RE.captures(line) {
        if let (Some(hashes), Some(body)) = (caps.get(1), caps.get(2)) {
            return Line::Heading(hashes.as_str().len(), body.as_str());
        }
    }
    if let Some(body) = LIST_ITEM_RE.captures(line).and_then(|caps| caps.get(1)) {
        return Line::ListItem(body.as_str());
    }
    Line::Text(line)
}

fn render_block(block: &str, theme: &MarkupTheme) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    for line in block.split('\n') {
        match classify(line) {
            Line::Heading(level, body) => {
                flush_list(&mut items, &mut out, theme);
                flush_paragraph(&mut paragraph, &mut out, theme);
                let class = match level {
                    1 => theme.h1,
                    2 => theme.h2,
                    _ => theme.h3,
                };
                out.push(format!(
                    "{}{}</h{level}>",
                    open_tag(&format!("h{level}"), class),
                    render_inline(body, theme)
                ));
            }
            Line::ListItem(body) => {
                flush_paragraph(&mut paragraph, &mut out, theme);
                items.push(format!("<li>{}</li>", render_inline(body, theme)));
            }
            Line::Text(body) => {
                flush_list(&mut items, &mut out, theme);
                paragraph.push(render_inline(body, theme));
            }
        }
    }
    flush_list(&mut items, &mut out, theme);
    flush_paragraph(&mut paragraph, &mut out, theme);

    out.join("\n")
}

fn flush_list(items: &mut Vec<String>, out: &mut Vec<String>, theme: &MarkupTheme) {
    if items.is_empty() {
        return;
    }
    out.push(format!(
        "{}{}</ul>",
        open_tag("ul", theme.ul),
        items.join("\n")
    ));
    items.clear();
}

fn flush_paragraph(lines: &mut Vec<String>, out: &mut Vec<String>, theme: &MarkupTheme) {
    if lines.is_empty() {
        return;
    }
    out.push(format!("{}{}</p>", open_tag("p", theme.p), lines.join("<br/>")));
    lines.clear();
}

fn render_inline(text: &str, theme: &MarkupTheme) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in CODE_RE.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&emphasize(&text[last..whole.start()]));
        out.push_str(&open_tag("code", theme.code));
        out.push_str(body.as_str());
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&emphasize(&text[last..]));
    out
}

fn emphasize(text: &str) -> String {
    let bold = BOLD_RE.replace_all(text, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bold, "<em>$1</em>").into_owned()
}

fn open_tag(tag: &str, class: &str) -> String {
    if class.is_empty() {
        format!("<{tag}>")
    } else {
        format!("<{tag} class=\"{class}\">")
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        classify, preview, render_markdown, render_markdown_with, sanitize, Line, MarkupTheme,
    };

    fn plain(text: &str) -> String {
        render_markdown_with(text, &MarkupTheme::plain())
    }

    #[test]
    fn bold_renders_strong() {
        assert!(render_markdown("**hi**").contains("<strong>hi</strong>"));
    }

    #[test]
    fn italic_and_code_render_inline() {
        assert_eq!(
            plain("an *em* and `x*y*z`"),
            "<p>an <em>em</em> and <code>x*y*z</code></p>"
        );
    }

    #[test]
    fn embedded_tags_are_stripped() {
        assert_eq!(sanitize("a<script>alert(1)</script>b"), "aalert(1)b");
        let html = plain("<b>bold</b> text");
        assert_eq!(html, "<p>bold text</p>");
    }

    #[test]
    fn stray_brackets_are_escaped() {
        assert_eq!(plain("1 < 2 & 3"), "<p>1 &lt; 2 &amp; 3</p>");
    }

    #[test]
    fn headings_need_space_after_hashes() {
        assert_eq!(classify("# One"), Line::Heading(1, "One"));
        assert_eq!(classify("### Three"), Line::Heading(3, "Three"));
        assert_eq!(classify("#### Four"), Line::Text("#### Four"));
        assert_eq!(classify("#tag"), Line::Text("#tag"));
    }

    #[test]
    fn heading_and_text_in_one_block() {
        assert_eq!(plain("## Title\nbody"), "<h2>Title</h2>\n<p>body</p>");
    }

    #[test]
    fn contiguous_list_items_share_one_wrapper() {
        assert_eq!(
            plain("- one\n* two\n  - three"),
            "<ul><li>one</li>\n<li>two</li>\n<li>three</li></ul>"
        );
    }

    #[test]
    fn separated_lists_get_separate_wrappers() {
        let html = plain("- a\n\ntext\n\n- b");
        assert_eq!(
            html,
            "<ul><li>a</li></ul>\n<p>text</p>\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn bold_line_is_not_a_list_item() {
        assert_eq!(plain("**bold** start"), "<p><strong>bold</strong> start</p>");
    }

    #[test]
    fn paragraph_lines_join_with_breaks() {
        assert_eq!(plain("a\nb\n\n\n\nc"), "<p>a<br/>b</p>\n<p>c</p>");
    }

    #[test]
    fn default_theme_adds_classes() {
        let html = render_markdown("# T");
        assert_eq!(html, "<h1 class=\"text-2xl font-extrabold mt-8\">T</h1>");
    }

    #[test]
    fn crlf_input_is_normalized() {
        assert_eq!(plain("a\r\n\r\nb"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn blank_preview_is_none() {
        assert_eq!(preview("   \n "), None);
        assert!(preview("x").is_some());
    }
}
