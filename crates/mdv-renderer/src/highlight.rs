//! Fenced code resolution and JSON highlighting.
//!
//! Post-pass over the block machine's fragment sequence: placeholders are
//! replaced with rendered code blocks in document order. Bodies tagged
//! `json` are pretty-printed and token-highlighted when they parse; a body
//! that does not parse degrades to escaped plain text.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::block::Fragment;
use crate::fence::FencedCode;
use crate::util::escape_html;

static JSON_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""(?:\\.|[^"\\])*"|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|\btrue\b|\bfalse\b|\bnull\b|[{}\[\]:,]|\s+"#,
    )
    .expect("invalid json token regex")
});

/// Replace code placeholders with rendered code blocks and join the
/// fragment sequence into the assembled HTML.
pub(crate) fn resolve(fragments: Vec<Fragment>, codes: &[FencedCode]) -> String {
    let parts: Vec<String> = fragments
        .into_iter()
        .map(|fragment| match fragment {
            Fragment::Html(html) => html,
            Fragment::Code(index) => codes.get(index).map(render_code).unwrap_or_default(),
        })
        .collect();
    parts.join("\n")
}

/// Render a single fenced code block.
fn render_code(code: &FencedCode) -> String {
    if code.lang.eq_ignore_ascii_case("json") {
        return render_json(code);
    }
    let lang_attr = if code.lang.is_empty() {
        String::new()
    } else {
        format!(r#" data-lang="{}""#, escape_html(&code.lang))
    };
    format!(
        "<pre class=\"md-codeblock\"{lang_attr}><code>{}</code></pre>",
        escape_html(&code.body)
    )
}

fn render_json(code: &FencedCode) -> String {
    let body = match serde_json::from_str::<serde_json::Value>(&code.body) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| code.body.clone());
            highlight_json(&pretty)
        }
        // Not valid JSON: no highlighting, just escaped text.
        Err(_) => escape_html(&code.body),
    };
    format!(r#"<pre class="md-codeblock" data-lang="json"><code>{body}</code></pre>"#)
}

/// Token-highlight a pretty-printed JSON document.
///
/// Strings, numbers, booleans and nulls get category spans; punctuation and
/// whitespace pass through unwrapped. A string is a key when the next
/// non-whitespace token is a colon.
fn highlight_json(json: &str) -> String {
    let spans: Vec<(usize, usize)> = JSON_TOKEN
        .find_iter(json)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut out = String::with_capacity(json.len() + 64);
    let mut last = 0;
    for (i, &(start, end)) in spans.iter().enumerate() {
        if start > last {
            out.push_str(&escape_html(&json[last..start]));
        }
        let token = &json[start..end];
        match token_class(token, i, &spans, json) {
            Some(class) => {
                write!(out, r#"<span class="{class}">{}</span>"#, escape_html(token)).unwrap();
            }
            None => out.push_str(&escape_html(token)),
        }
        last = end;
    }
    if last < json.len() {
        out.push_str(&escape_html(&json[last..]));
    }
    out
}

/// Category class for a token, or `None` for punctuation and whitespace.
fn token_class(
    token: &str,
    index: usize,
    spans: &[(usize, usize)],
    json: &str,
) -> Option<&'static str> {
    let first = token.chars().next()?;
    if first.is_whitespace() {
        return None;
    }
    match first {
        '{' | '}' | '[' | ']' | ':' | ',' => None,
        '"' => {
            if is_key(index, spans, json) {
                Some("md-json-key")
            } else {
                Some("md-json-string")
            }
        }
        't' | 'f' => Some("md-json-boolean"),
        'n' => Some("md-json-null"),
        _ => Some("md-json-number"),
    }
}

/// A string token is a key when the next non-whitespace token is `:`.
fn is_key(index: usize, spans: &[(usize, usize)], json: &str) -> bool {
    for &(start, end) in &spans[index + 1..] {
        let token = &json[start..end];
        if token.chars().all(char::is_whitespace) {
            continue;
        }
        return token == ":";
    }
    false
}
