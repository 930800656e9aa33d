//! Shared escaping and URL utilities.

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Sanitize a link target before it is placed in an anchor's `href`.
///
/// Trims surrounding whitespace and replaces `javascript:` and `data:`
/// scheme URLs (case-insensitive) with an inert `#`. No allow-list is
/// applied; every other URL passes through unchanged.
#[must_use]
pub(crate) fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") {
        return "#".to_owned();
    }
    trimmed.to_owned()
}
