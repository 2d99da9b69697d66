//! Minimal markup: `**bold**` spans and `*` bullet lines
//!
//! Generated suggestions arrive as loosely formatted text. [`render`] turns that
//! text into a small node tree so the caller decides how to display it; nothing
//! in the input is ever interpreted as markup beyond these two constructs.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

/// Inline content of a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum Inline {
    Text(String),
    Bold(String),
    LineBreak,
}

/// Rendered markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "children", rename_all = "kebab-case")]
pub enum Markup {
    /// Free text; source line breaks are kept as [`Inline::LineBreak`]
    Paragraph(Vec<Inline>),
    /// Every source line was a `*` bullet; one item per line
    List(Vec<Vec<Inline>>),
}

/// Render constrained markup text into a node tree
///
/// Bold spans are matched non-greedily, left to right, within a single line.
/// The text is a list only when every line (empty ones included) starts with
/// `*` once bold spans are taken out; otherwise it is one paragraph.
pub fn render(text: &str) -> Markup {
    debug!(text_len = text.len(), "render: called");
    if text.trim().is_empty() {
        debug!("render: blank input");
        return Markup::Paragraph(Vec::new());
    }

    let lines: Vec<Vec<Inline>> = text.split('\n').map(|line| parse_inline(line.trim())).collect();

    if lines.iter().all(|nodes| is_bullet(nodes)) {
        debug!(items = lines.len(), "render: list");
        return Markup::List(lines.into_iter().map(strip_bullet).collect());
    }

    debug!(lines = lines.len(), "render: paragraph");
    let mut nodes = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            nodes.push(Inline::LineBreak);
        }
        nodes.extend(line);
    }
    Markup::Paragraph(nodes)
}

/// Split one line into text and bold nodes; empty text nodes are dropped
fn parse_inline(line: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            nodes.push(Inline::Text(line[cursor..whole.start()].to_string()));
        }
        nodes.push(Inline::Bold(inner.as_str().to_string()));
        cursor = whole.end();
    }

    if cursor < line.len() {
        nodes.push(Inline::Text(line[cursor..].to_string()));
    }
    nodes
}

fn is_bullet(nodes: &[Inline]) -> bool {
    matches!(nodes.first(), Some(Inline::Text(t)) if t.starts_with('*'))
}

/// Drop the leading `*` and the whitespace after it
fn strip_bullet(mut nodes: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(first)) = nodes.first_mut() {
        let rest = first.strip_prefix('*').unwrap_or(first.as_str()).trim_start().to_string();
        if rest.is_empty() {
            nodes.remove(0);
        } else {
            *first = rest;
        }
    }
    nodes
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline_html(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(t) => out.push_str(&escape_html(t)),
            Inline::Bold(t) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(t));
                out.push_str("</strong>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

fn inline_plain(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(t) | Inline::Bold(t) => out.push_str(t),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

impl Markup {
    /// HTML with every text node escaped
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        match self {
            Markup::Paragraph(nodes) => {
                out.push_str("<p>");
                inline_html(nodes, &mut out);
                out.push_str("</p>");
            }
            Markup::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    inline_html(item, &mut out);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
        }
        out
    }

    /// Text without formatting; list items become `- ` lines
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        match self {
            Markup::Paragraph(nodes) => inline_plain(nodes, &mut out),
            Markup::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str("- ");
                    inline_plain(item, &mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(s.to_string())
    }

    #[test]
    fn test_bold_then_text() {
        assert_eq!(render("**bold** text"), Markup::Paragraph(vec![bold("bold"), text(" text")]));
    }

    #[test]
    fn test_simple_list() {
        assert_eq!(render("*a\n*b"), Markup::List(vec![vec![text("a")], vec![text("b")]]));
    }

    #[test]
    fn test_list_strips_marker_whitespace_and_keeps_bold() {
        let markup = render("  * **Trivia night** at the pub\n*   Board games ");
        assert_eq!(
            markup,
            Markup::List(vec![
                vec![bold("Trivia night"), text(" at the pub")],
                vec![text("Board games")],
            ])
        );
    }

    #[test]
    fn test_mixed_lines_are_a_paragraph() {
        let markup = render("Try these:\n* Bowling");
        assert_eq!(
            markup,
            Markup::Paragraph(vec![text("Try these:"), Inline::LineBreak, text("* Bowling")])
        );
    }

    #[test]
    fn test_empty_line_breaks_list() {
        assert!(matches!(render("*a\n\n*b"), Markup::Paragraph(_)));
    }

    #[test]
    fn test_line_starting_with_bold_is_not_a_bullet() {
        assert_eq!(render("**Go** out"), Markup::Paragraph(vec![bold("Go"), text(" out")]));
    }

    #[test]
    fn test_non_greedy_bold() {
        assert_eq!(
            render("**a** and **b**"),
            Markup::Paragraph(vec![bold("a"), text(" and "), bold("b")])
        );
    }

    #[test]
    fn test_bold_does_not_span_lines() {
        assert_eq!(
            render("**a\nb**"),
            Markup::Paragraph(vec![text("**a"), Inline::LineBreak, text("b**")])
        );
    }

    #[test]
    fn test_unsupported_markup_passes_through() {
        assert_eq!(
            render("# _hi_ [x](y)"),
            Markup::Paragraph(vec![text("# _hi_ [x](y)")])
        );
    }

    #[test]
    fn test_blank_input_is_empty_paragraph() {
        assert_eq!(render(""), Markup::Paragraph(vec![]));
        assert_eq!(render("  \n \t"), Markup::Paragraph(vec![]));
    }

    #[test]
    fn test_to_html_escapes() {
        let markup = render("**<b>** & <script>x</script>");
        assert_eq!(
            markup.to_html(),
            "<p><strong>&lt;b&gt;</strong> &amp; &lt;script&gt;x&lt;/script&gt;</p>"
        );
        assert_eq!(render("*a\n*b").to_html(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render("*a\n* **b**").plain_text(), "- a\n- b");
        assert_eq!(render("x\ny").plain_text(), "x\ny");
    }
}
