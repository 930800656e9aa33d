//! Output sanitization.
//!
//! Final denylist pass over the assembled HTML: strips `script`/`style`
//! tags and inline event-handler attributes. Template reference tokens
//! such as `@{Name}` and bare curly braces are meaningful to callers and
//! pass through untouched. This is a denylist, not a structural HTML
//! parser; patterns outside the denylist are a documented limitation.

use std::sync::LazyLock;

use regex::Regex;

static TAG_DENYLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:script|style)[^>]*>").expect("invalid tag denylist regex")
});
static ON_ATTR_DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\son[a-z]+\s*=\s*"[^"]*""#).expect("invalid event attribute regex")
});
static ON_ATTR_SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\son[a-z]+\s*=\s*'[^']*'").expect("invalid event attribute regex")
});
static ON_ATTR_UNQUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\son[a-z]+\s*=\s*[^\s>]+").expect("invalid event attribute regex")
});

/// Strip denylisted tags and attributes from rendered HTML.
///
/// Sanitizing already-sanitized output is a no-op.
#[must_use]
pub fn sanitize(html: &str) -> String {
    let stripped_tags = TAG_DENYLIST.find_iter(html).count();
    if stripped_tags > 0 {
        tracing::debug!(stripped_tags, "removed denylisted tags");
    }

    let html = TAG_DENYLIST.replace_all(html, "");
    let html = ON_ATTR_DOUBLE_QUOTED.replace_all(&html, "");
    let html = ON_ATTR_SINGLE_QUOTED.replace_all(&html, "");
    ON_ATTR_UNQUOTED.replace_all(&html, "").into_owned()
}
