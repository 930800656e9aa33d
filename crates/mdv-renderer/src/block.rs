//! Block-level parsing state machine.
//!
//! Consumes classified lines and emits a flat ordered sequence of HTML
//! fragments. At most one of {paragraph buffer, table accumulator,
//! blockquote buffer} is open at a time, alongside a stack of nested list
//! frames. Any line starting a different block kind, or a blank line,
//! flushes the open accumulators (paragraph, table, blockquote, then the
//! list stack, in that order) before a new one opens. There is no
//! parse-error state: anything unmatched degrades to paragraph text.

use std::fmt::Write;

use crate::fence::SourceLine;
use crate::inline::format_inline;
use crate::line::{self, LineKind};
use crate::renderer::{self, RenderOptions};

/// Flat output unit of the block state machine.
///
/// Fenced code stays unresolved here; the resolver substitutes rendered
/// code blocks after block and inline processing has finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fragment {
    /// Rendered HTML.
    Html(String),
    /// Fenced code block at the given side-table index.
    Code(usize),
}

/// Kind of an open list frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            Self::Ordered => "<ol>",
            Self::Unordered => "<ul>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            Self::Ordered => "</ol>",
            Self::Unordered => "</ul>",
        }
    }
}

/// Open table accumulator: header cells plus body rows seen so far.
struct TableBuf {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Parse extracted lines into fragments.
///
/// `depth` is the blockquote nesting level; quote bodies recurse into
/// [`renderer::render_document`] one level deeper.
pub(crate) fn parse_lines(
    lines: &[SourceLine],
    opts: &RenderOptions,
    depth: usize,
) -> Vec<Fragment> {
    let mut parser = BlockParser::new(opts, depth);
    let mut i = 0;
    while i < lines.len() {
        match &lines[i] {
            SourceLine::Code(index) => {
                parser.flush_all();
                parser.out.push(Fragment::Code(*index));
                i += 1;
            }
            SourceLine::Text(text) => {
                // Table detection needs one line of lookahead.
                let next = match lines.get(i + 1) {
                    Some(SourceLine::Text(next)) => Some(next.as_str()),
                    _ => None,
                };
                i += if parser.step(text, next) { 2 } else { 1 };
            }
        }
    }
    parser.finish()
}

struct BlockParser<'a> {
    opts: &'a RenderOptions,
    depth: usize,
    out: Vec<Fragment>,
    paragraph: Vec<String>,
    quote: Vec<String>,
    table: Option<TableBuf>,
    lists: Vec<ListKind>,
}

impl<'a> BlockParser<'a> {
    fn new(opts: &'a RenderOptions, depth: usize) -> Self {
        Self {
            opts,
            depth,
            out: Vec::new(),
            paragraph: Vec::new(),
            quote: Vec::new(),
            table: None,
            lists: Vec::new(),
        }
    }

    /// Process one line. Returns `true` when the lookahead line (a table
    /// separator) was consumed as well.
    fn step(&mut self, line: &str, next: Option<&str>) -> bool {
        match line::classify(line) {
            LineKind::Rule => {
                self.flush_all();
                self.out.push(Fragment::Html("<hr />".to_owned()));
            }
            LineKind::Heading { level, text } => {
                self.flush_all();
                let content = format_inline(text.trim(), self.opts);
                self.out
                    .push(Fragment::Html(format!("<h{level}>{content}</h{level}>")));
            }
            LineKind::Quote { text } => {
                self.flush_paragraph();
                self.flush_table();
                self.flush_lists();
                self.quote.push(text.to_owned());
            }
            LineKind::Ordered { indent, text } => {
                self.list_item(ListKind::Ordered, indent, text);
            }
            LineKind::Unordered { indent, text } => {
                self.list_item(ListKind::Unordered, indent, text);
            }
            LineKind::Blank => self.flush_all(),
            LineKind::Text => return self.text_line(line, next),
        }
        false
    }

    /// Handle a plain text line: table start (with lookahead), table row,
    /// or paragraph accumulation.
    fn text_line(&mut self, line: &str, next: Option<&str>) -> bool {
        if line::has_pipe(line) && next.is_some_and(line::is_table_separator) {
            self.flush_all();
            self.table = Some(TableBuf {
                header: line::split_table_row(line),
                rows: Vec::new(),
            });
            return true;
        }

        if self.table.is_some() {
            if line::has_pipe(line) {
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(line::split_table_row(line));
                }
                return false;
            }
            // A pipe-less line ends the table and restarts as a new block.
            self.flush_table();
        }

        if self.paragraph.is_empty() {
            self.flush_quote();
            self.flush_lists();
        }

        // A trailing backslash becomes the hard-break marker resolved by
        // the inline pass.
        let trimmed = line.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            self.paragraph.push(format!("{stripped}  "));
        } else {
            self.paragraph.push(line.to_owned());
        }
        false
    }

    /// Handle a list item: adjust the frame stack to the item's depth and
    /// kind, then emit the item.
    fn list_item(&mut self, kind: ListKind, indent: usize, text: &str) {
        self.flush_paragraph();
        self.flush_table();
        self.flush_quote();

        let depth = indent / 2;
        while self.lists.len() > depth + 1 {
            self.close_list_frame();
        }
        if self.lists.len() == depth + 1 && self.lists.last() != Some(&kind) {
            // Kind change at the same depth: close and reopen, silently.
            self.close_list_frame();
        }
        while self.lists.len() < depth + 1 {
            self.open_list_frame(kind);
        }

        let content = format_inline(text, self.opts);
        self.out.push(Fragment::Html(format!("<li>{content}</li>")));
    }

    fn open_list_frame(&mut self, kind: ListKind) {
        self.out.push(Fragment::Html(kind.open_tag().to_owned()));
        self.lists.push(kind);
    }

    fn close_list_frame(&mut self) {
        if let Some(kind) = self.lists.pop() {
            self.out.push(Fragment::Html(kind.close_tag().to_owned()));
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let joined = std::mem::take(&mut self.paragraph).join("\n");
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            let content = format_inline(trimmed, self.opts);
            self.out.push(Fragment::Html(format!("<p>{content}</p>")));
        }
    }

    fn flush_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        let mut html = String::from("<table><thead><tr>");
        for cell in &table.header {
            write!(html, "<th>{}</th>", format_inline(cell, self.opts)).unwrap();
        }
        html.push_str("</tr></thead><tbody>");
        for row in &table.rows {
            html.push_str("<tr>");
            for cell in row {
                write!(html, "<td>{}</td>", format_inline(cell, self.opts)).unwrap();
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        self.out.push(Fragment::Html(html));
    }

    /// Render the buffered quote body by recursing into the whole pipeline
    /// one level deeper, bounded by `max_quote_depth`.
    fn flush_quote(&mut self) {
        if self.quote.is_empty() {
            return;
        }
        let inner = std::mem::take(&mut self.quote).join("\n");
        let html = if self.depth + 1 <= self.opts.max_quote_depth {
            renderer::render_document(&inner, self.opts, self.depth + 1)
        } else {
            // Past the bound the body stays flat: inline formatting only.
            format!("<p>{}</p>", format_inline(inner.trim(), self.opts))
        };
        self.out
            .push(Fragment::Html(format!("<blockquote>{html}</blockquote>")));
    }

    fn flush_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_list_frame();
        }
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_table();
        self.flush_quote();
        self.flush_lists();
    }

    fn finish(mut self) -> Vec<Fragment> {
        self.flush_all();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Render through the block machine without the final sanitizer pass.
    fn blocks(markdown: &str) -> String {
        renderer::render_document(markdown, &RenderOptions::default(), 0)
    }

    #[test]
    fn test_heading() {
        assert_eq!(blocks("# Title"), "<h1>Title</h1>");
        assert_eq!(blocks("###### Small"), "<h6>Small</h6>");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(blocks("---"), "<hr />");
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(blocks("one\ntwo"), "<p>one\ntwo</p>");
    }

    #[test]
    fn test_paragraphs_split_on_blank() {
        assert_eq!(blocks("one\n\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_paragraph_hard_break_backslash() {
        assert_eq!(blocks("one\\\ntwo"), "<p>one<br/>\ntwo</p>");
    }

    #[test]
    fn test_flat_unordered_list() {
        assert_eq!(blocks("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn test_flat_ordered_list() {
        assert_eq!(
            blocks("1. first\n2. second"),
            "<ol>\n<li>first</li>\n<li>second</li>\n</ol>"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            blocks("- a\n  - b\n- c"),
            "<ul>\n<li>a</li>\n<ul>\n<li>b</li>\n</ul>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn test_list_kind_change_closes_and_reopens() {
        assert_eq!(
            blocks("- a\n1. b"),
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>"
        );
    }

    #[test]
    fn test_list_depth_jump_opens_frames() {
        assert_eq!(
            blocks("- a\n    - b"),
            "<ul>\n<li>a</li>\n<ul>\n<ul>\n<li>b</li>\n</ul>\n</ul>\n</ul>"
        );
    }

    #[test]
    fn test_list_closed_by_heading() {
        assert_eq!(
            blocks("- a\n# Done"),
            "<ul>\n<li>a</li>\n</ul>\n<h1>Done</h1>"
        );
    }

    #[test]
    fn test_list_closed_by_text_line() {
        assert_eq!(blocks("- a\nplain"), "<ul>\n<li>a</li>\n</ul>\n<p>plain</p>");
    }

    #[test]
    fn test_blockquote_recurses() {
        assert_eq!(
            blocks("> # Title\n> body"),
            "<blockquote><h1>Title</h1>\n<p>body</p></blockquote>"
        );
    }

    #[test]
    fn test_blockquote_terminated_by_blank() {
        assert_eq!(
            blocks("> quoted\n\nafter"),
            "<blockquote><p>quoted</p></blockquote>\n<p>after</p>"
        );
    }

    #[test]
    fn test_blockquote_terminated_by_heading() {
        assert_eq!(
            blocks("> quoted\n# Next"),
            "<blockquote><p>quoted</p></blockquote>\n<h1>Next</h1>"
        );
    }

    #[test]
    fn test_blockquote_depth_bound_degrades_to_flat_text() {
        let opts = RenderOptions {
            max_quote_depth: 1,
            ..RenderOptions::default()
        };
        let html = renderer::render_document("> > # Deep", &opts, 0);
        assert!(!html.contains("<h1>"));
        assert!(html.contains("# Deep"));
    }

    #[test]
    fn test_table() {
        assert_eq!(
            blocks("| A | B |\n|---|---|\n| 1 | 2 |"),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_table_multiple_rows() {
        let html = blocks("| A |  B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |");
        assert!(html.contains("<td>3</td><td>4</td>"));
    }

    #[test]
    fn test_table_ends_on_pipeless_line() {
        assert_eq!(
            blocks("| A | B |\n|---|---|\n| 1 | 2 |\nplain"),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>\n<p>plain</p>"
        );
    }

    #[test]
    fn test_table_requires_separator_lookahead() {
        // A pipe line without a following separator is just paragraph text.
        assert_eq!(blocks("| not | a table |"), "<p>| not | a table |</p>");
    }

    #[test]
    fn test_table_flushes_open_paragraph() {
        assert_eq!(
            blocks("intro\n| A | B |\n|---|---|"),
            "<p>intro</p>\n<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody></tbody></table>"
        );
    }

    #[test]
    fn test_fenced_code_is_its_own_block() {
        let html = blocks("para\n```\ncode\n```\nafter");
        assert_eq!(
            html,
            "<p>para</p>\n<pre class=\"md-codeblock\"><code>code\n</code></pre>\n<p>after</p>"
        );
    }

    #[test]
    fn test_cell_inline_formatting() {
        let html = blocks("| **b** | `c` |\n|---|---|");
        assert!(html.contains("<th><strong>b</strong></th>"));
        assert!(html.contains("<th><code>c</code></th>"));
    }
}
