//! Fenced code block extraction.
//!
//! Pre-pass that lifts fenced code regions out of the input before any block
//! or inline rule runs. Each region becomes a typed placeholder line
//! referencing an entry in an index-addressed side table, so code content —
//! including characters that look like markdown syntax — survives the rest
//! of the pipeline verbatim.

/// A fenced code region captured by the extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FencedCode {
    /// Language tag from the opening fence (possibly empty).
    pub(crate) lang: String,
    /// Verbatim body, internal newlines preserved.
    pub(crate) body: String,
}

/// A single input line after extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SourceLine {
    /// Ordinary text line, still subject to block and inline rules.
    Text(String),
    /// Placeholder for the fenced code block at the given side-table index.
    Code(usize),
}

/// Extract fenced code regions from `text`.
///
/// Captured regions are appended to `table`, so indices stay stable when a
/// nested parse level (blockquote recursion) shares the document's numbering.
/// An unclosed fence at end of input is replayed as plain text.
pub(crate) fn extract(text: &str, table: &mut Vec<FencedCode>) -> Vec<SourceLine> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let Some((fence_char, fence_len, lang)) = detect_fence(lines[i]) else {
            out.push(SourceLine::Text(lines[i].to_owned()));
            i += 1;
            continue;
        };

        match find_closing(&lines, i + 1, fence_char, fence_len) {
            Some(end) => {
                let mut body = lines[i + 1..end].join("\n");
                if end > i + 1 {
                    body.push('\n');
                }
                out.push(SourceLine::Code(table.len()));
                table.push(FencedCode { lang, body });
                i = end + 1;
            }
            None => {
                // Unclosed fence: the opening line is ordinary text.
                out.push(SourceLine::Text(lines[i].to_owned()));
                i += 1;
            }
        }
    }

    out
}

/// Detect an opening fence line.
///
/// Returns the fence character, its run length, and the language tag (first
/// whitespace-separated word of the info string, possibly empty).
fn detect_fence(line: &str) -> Option<(char, usize, String)> {
    let trimmed = line.trim_start();
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }

    let lang = trimmed[count..]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_owned();
    Some((first, count, lang))
}

/// Find the index of the closing fence line, if any.
///
/// The closing fence must use the same character, be at least as long as the
/// opening fence, and carry nothing but whitespace after the run.
fn find_closing(lines: &[&str], from: usize, fence_char: char, min_len: usize) -> Option<usize> {
    lines[from..]
        .iter()
        .position(|line| is_closing_fence(line, fence_char, min_len))
        .map(|offset| from + offset)
}

fn is_closing_fence(line: &str, fence_char: char, min_len: usize) -> bool {
    let trimmed = line.trim_start();
    let count = trimmed.chars().take_while(|&c| c == fence_char).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_all(text: &str) -> (Vec<SourceLine>, Vec<FencedCode>) {
        let mut table = Vec::new();
        let lines = extract(text, &mut table);
        (lines, table)
    }

    #[test]
    fn test_no_fences() {
        let (lines, table) = extract_all("plain\ntext");
        assert_eq!(
            lines,
            vec![
                SourceLine::Text("plain".to_owned()),
                SourceLine::Text("text".to_owned()),
            ]
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_basic_fence() {
        let (lines, table) = extract_all("before\n```rust\nfn main() {}\n```\nafter");
        assert_eq!(
            lines,
            vec![
                SourceLine::Text("before".to_owned()),
                SourceLine::Code(0),
                SourceLine::Text("after".to_owned()),
            ]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].lang, "rust");
        assert_eq!(table[0].body, "fn main() {}\n");
    }

    #[test]
    fn test_fence_without_language() {
        let (_, table) = extract_all("```\nplain\n```");
        assert_eq!(table[0].lang, "");
        assert_eq!(table[0].body, "plain\n");
    }

    #[test]
    fn test_empty_fence_body() {
        let (_, table) = extract_all("```json\n```");
        assert_eq!(table[0].lang, "json");
        assert_eq!(table[0].body, "");
    }

    #[test]
    fn test_markdown_syntax_inside_fence_protected() {
        let (lines, table) = extract_all("```\n# not a heading\n- not a list\n```");
        assert_eq!(lines, vec![SourceLine::Code(0)]);
        assert_eq!(table[0].body, "# not a heading\n- not a list\n");
    }

    #[test]
    fn test_tilde_fence() {
        let (_, table) = extract_all("~~~python\nprint('hi')\n~~~");
        assert_eq!(table[0].lang, "python");
    }

    #[test]
    fn test_mismatched_fence_char_does_not_close() {
        let (lines, table) = extract_all("```\n~~~\ncode\n```");
        assert_eq!(lines, vec![SourceLine::Code(0)]);
        assert_eq!(table[0].body, "~~~\ncode\n");
    }

    #[test]
    fn test_shorter_closing_fence_ignored() {
        let (_, table) = extract_all("````\n```\n````");
        assert_eq!(table[0].body, "```\n");
    }

    #[test]
    fn test_unclosed_fence_replayed_as_text() {
        let (lines, table) = extract_all("```json\n{\"a\": 1}");
        assert!(table.is_empty());
        assert_eq!(
            lines,
            vec![
                SourceLine::Text("```json".to_owned()),
                SourceLine::Text("{\"a\": 1}".to_owned()),
            ]
        );
    }

    #[test]
    fn test_multiple_fences_indexed_in_order() {
        let (lines, table) = extract_all("```a\nx\n```\nmid\n```b\ny\n```");
        assert_eq!(
            lines,
            vec![
                SourceLine::Code(0),
                SourceLine::Text("mid".to_owned()),
                SourceLine::Code(1),
            ]
        );
        assert_eq!(table[0].lang, "a");
        assert_eq!(table[1].lang, "b");
    }

    #[test]
    fn test_indices_continue_across_calls() {
        let mut table = Vec::new();
        extract("```a\nx\n```", &mut table);
        let lines = extract("```b\ny\n```", &mut table);
        assert_eq!(lines, vec![SourceLine::Code(1)]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_two_backticks_not_a_fence() {
        let (lines, table) = extract_all("``inline``");
        assert_eq!(lines, vec![SourceLine::Text("``inline``".to_owned())]);
        assert!(table.is_empty());
    }
}
