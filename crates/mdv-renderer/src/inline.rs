//! Inline formatting.
//!
//! Converts block-resolved text into inline HTML. Rules run in a fixed
//! order so they cannot interfere with each other: hard breaks, then code
//! span protection, then links, then bold before italic, then code span
//! restoration. Unbalanced delimiters are never an error — a rule that does
//! not match leaves its characters literal.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::renderer::RenderOptions;
use crate::util::{escape_html, sanitize_url};

static HARD_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2}(\n|$)").expect("invalid hard break regex"));
static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("invalid code span regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("invalid link regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("invalid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("invalid italic regex"));

/// Marker standing in for a protected code span while the other inline
/// rules run. Input is NUL-free (normalized up front), so the marker cannot
/// collide with document text.
const PROTECTED: char = '\u{0}';

/// Apply inline formatting rules to a block's text.
pub(crate) fn format_inline(text: &str, opts: &RenderOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    // 1. Hard breaks: two trailing spaces before a line end.
    let text = HARD_BREAK.replace_all(text, "<br/>$1");

    // 2. Protect code spans; their content must not see the rules below.
    let mut spans: Vec<String> = Vec::new();
    let text = CODE_SPAN.replace_all(&text, |caps: &Captures<'_>| {
        spans.push(caps[1].to_owned());
        PROTECTED.to_string()
    });

    // 3. Links, with the href sanitized.
    let anchor_attrs = if opts.external_links {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    let text = LINK.replace_all(&text, |caps: &Captures<'_>| {
        format!(
            r#"<a href="{}"{anchor_attrs}>{}</a>"#,
            sanitize_url(&caps[2]),
            escape_html(&caps[1]),
        )
    });

    // 4. Bold before italic, so `**` is never half-eaten by the `*` rule.
    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC.replace_all(&text, "<em>${1}</em>");

    // 5. Restore code spans last, escaped, in order.
    if spans.is_empty() {
        return text.into_owned();
    }
    let mut out = String::with_capacity(text.len() + spans.len() * 16);
    let mut queue = spans.into_iter();
    for (i, part) in text.split(PROTECTED).enumerate() {
        if i > 0 {
            if let Some(code) = queue.next() {
                out.push_str("<code>");
                out.push_str(&escape_html(&code));
                out.push_str("</code>");
            }
        }
        out.push_str(part);
    }
    out
}
