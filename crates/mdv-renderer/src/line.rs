//! Line classification.
//!
//! Categorizes each input line into a closed set of kinds. Classification is
//! first-match-wins and the order is load-bearing: a `---` line is a rule,
//! never a list item; a `>` line is a quote even when indented. Table starts
//! are not classified here — they need a one-line lookahead at the separator
//! line, which the block state machine performs.

use std::sync::LazyLock;

use regex::Regex;

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{3,}\s*$").expect("invalid rule regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("invalid heading regex"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?").expect("invalid quote regex"));
static ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\d+\.\s+(.*)$").expect("invalid ordered item regex"));
static UNORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").expect("invalid unordered item regex"));
static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-{3,}:?\s*(\|\s*:?-{3,}:?\s*)+\|?\s*$")
        .expect("invalid table separator regex")
});

/// Kind of a single input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Horizontal rule (`---`).
    Rule,
    /// Heading with level 1-6.
    Heading { level: usize, text: &'a str },
    /// Blockquote line, marker and at most one following space stripped.
    Quote { text: &'a str },
    /// Ordered list item.
    Ordered { indent: usize, text: &'a str },
    /// Unordered list item.
    Unordered { indent: usize, text: &'a str },
    /// Whitespace-only line.
    Blank,
    /// Anything else: paragraph text or a table row candidate.
    Text,
}

/// Classify a line. First match wins.
pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if RULE.is_match(line) {
        return LineKind::Rule;
    }
    if let Some(caps) = HEADING.captures(line) {
        return LineKind::Heading {
            level: caps[1].len(),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(m) = QUOTE.find(line) {
        return LineKind::Quote {
            text: &line[m.end()..],
        };
    }
    if let Some(caps) = ORDERED.captures(line) {
        return LineKind::Ordered {
            indent: caps[1].len(),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(caps) = UNORDERED.captures(line) {
        return LineKind::Unordered {
            indent: caps[1].len(),
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    LineKind::Text
}

/// Check whether a line is a table header/body separator
/// (pipe-delimited cells of `:?-{3,}:?`).
pub(crate) fn is_table_separator(line: &str) -> bool {
    TABLE_SEPARATOR.is_match(line)
}

/// Check whether a line can belong to a table.
pub(crate) fn has_pipe(line: &str) -> bool {
    line.contains('|')
}

/// Split a table row into trimmed cells.
///
/// Outer pipes are stripped; `\|` yields a literal pipe inside a cell.
pub(crate) fn split_table_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => {
                cells.push(cell.trim().to_owned());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_owned());
    cells
}
