//! Markdown rendering service
//!
//! Article bodies are stored as Markdown and rendered to HTML when a reader
//! opens the article page. Plain text separated by blank lines renders as
//! paragraphs, so bodies written without any Markdown still read correctly.
//!
//! Raw HTML embedded in the source is escaped rather than passed through.
//!
//! # Example
//!
//! ```
//! use newsdesk::services::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Headline\n\nThis is **bold** text.");
//! assert!(html.contains("<h1>"));
//! assert!(html.contains("<strong>"));
//! ```

use pulldown_cmark::{html, Event, Options, Parser};

/// A stateless Markdown renderer.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        Self { options }
    }

    /// Renders Markdown text to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Plain-text teaser for listings when an article has no excerpt.
    ///
    /// Takes the first paragraph of the rendered text, cut at `max_chars`
    /// on a word boundary.
    pub fn plain_excerpt(&self, markdown: &str, max_chars: usize) -> String {
        let mut text = String::new();
        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(pulldown_cmark::TagEnd::Heading(_)) => text.push(' '),
                Event::End(pulldown_cmark::TagEnd::Paragraph) if !text.is_empty() => break,
                _ => {}
            }
        }

        let text = text.trim();
        if text.chars().count() <= max_chars {
            return text.to_string();
        }

        let cut: String = text.chars().take(max_chars).collect();
        let cut = match cut.rfind(' ') {
            Some(idx) if idx > 0 => &cut[..idx],
            _ => cut.as_str(),
        };
        format!("{}…", cut.trim_end())
    }
}
