//! Line-oriented markdown-to-HTML rendering engine.
//!
//! Turns an untrusted text string into a sanitized HTML fragment. Supports
//! headings, horizontal rules, nested lists, blockquotes, tables, fenced
//! code (with a lightweight JSON highlighter), and inline formatting (bold,
//! italic, code spans, links, hard breaks).
//!
//! # Architecture
//!
//! Rendering is a fixed pipeline of passes:
//!
//! 1. Fenced code regions are lifted into an index-addressed side table
//!    (`fence`), so code content never meets the block or inline rules.
//! 2. Remaining lines are classified into a closed set of kinds (`line`)
//!    and fed through a block state machine (`block`) that emits a flat
//!    fragment sequence, formatting each text unit inline (`inline`).
//! 3. Code placeholders are resolved back in (`highlight`), then a denylist
//!    sanitizer runs once over the assembled output ([`sanitize`]).
//!
//! Rendering is total: malformed input degrades to literal or escaped text,
//! never an error.
//!
//! # Example
//!
//! ```
//! let html = mdv_renderer::render("# Hello\n\n**Bold** text");
//! assert_eq!(html, "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>");
//! ```

mod block;
mod fence;
mod highlight;
mod inline;
mod line;
mod renderer;
mod sanitize;
mod util;

pub use renderer::{MarkdownRenderer, RenderOptions, render};
pub use sanitize::sanitize;
pub use util::escape_html;
