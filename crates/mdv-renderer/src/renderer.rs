//! Top-level rendering pipeline and configuration.

use crate::{block, fence, highlight, sanitize};

/// Rendering configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Maximum blockquote nesting depth rendered structurally. Quote bodies
    /// past the bound degrade to flat inline-formatted paragraphs, keeping
    /// recursion bounded on adversarial input.
    pub max_quote_depth: usize,
    /// Emit `target="_blank" rel="noopener noreferrer"` on every anchor,
    /// for callers that inject the output into an external display surface.
    pub external_links: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_quote_depth: 16,
            external_links: false,
        }
    }
}

/// Markdown renderer with adjustable options.
///
/// Rendering is a pure function of the input text: every call builds its
/// own buffers, so a renderer is freely shareable across threads.
///
/// # Example
///
/// ```
/// use mdv_renderer::MarkdownRenderer;
///
/// let html = MarkdownRenderer::new().render("# Hello\n\n**Bold** text");
/// assert!(html.contains("<h1>Hello</h1>"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    opts: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum structurally-rendered blockquote nesting depth.
    #[must_use]
    pub fn with_max_quote_depth(mut self, depth: usize) -> Self {
        self.opts.max_quote_depth = depth;
        self
    }

    /// Emit `target`/`rel` attributes on rendered links.
    #[must_use]
    pub fn with_external_links(mut self) -> Self {
        self.opts.external_links = true;
        self
    }

    /// Render markdown text to a sanitized HTML fragment string.
    ///
    /// Total over all inputs: never fails, and empty input yields empty
    /// output. Malformed constructs degrade to literal or escaped text.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let text = normalize(markdown);
        if text.is_empty() {
            return String::new();
        }
        let html = render_document(&text, &self.opts, 0);
        sanitize::sanitize(&html)
    }
}

/// Render markdown with default options.
#[must_use]
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}

/// Normalize line endings and strip NUL characters, which are reserved for
/// the inline pass's protected-span markers.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\u{0}', "")
}

/// Run the extraction, block, and resolution passes over one parse level.
///
/// Blockquote bodies re-enter here with `depth + 1`; the sanitizer runs
/// once, over the fully assembled document, not per level.
pub(crate) fn render_document(text: &str, opts: &RenderOptions, depth: usize) -> String {
    let mut codes = Vec::new();
    let lines = fence::extract(text, &mut codes);
    if depth == 0 {
        tracing::debug!(lines = lines.len(), fences = codes.len(), "parsing document");
    }
    let fragments = block::parse_lines(&lines, opts, depth);
    highlight::resolve(fragments, &codes)
}
