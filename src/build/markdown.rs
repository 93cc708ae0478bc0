//! Markdown rendering.

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML using pulldown-cmark.
///
/// Enables the GFM-style extensions posts rely on (tables, strikethrough,
/// task lists, footnotes). Raw HTML passes through untouched; post sources
/// are trusted input.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
