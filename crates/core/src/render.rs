//! Markdown to HTML rendering used for intro files and part headers.

use crate::{EbookError, SourceLocation};
use markdown::message::{Message, Place};

/// Renders a Markdown document into an HTML fragment.
pub trait MarkdownRenderer {
    /// Render `input` to HTML.
    fn render(&self, input: &str) -> Result<String, EbookError>;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> Result<String, EbookError>,
{
    fn render(&self, input: &str) -> Result<String, EbookError> {
        (self)(input)
    }
}

/// Renderer options mapped onto markdown-rs.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Pass raw HTML through instead of escaping it.
    pub raw_html: bool,
}

impl RenderOptions {
    /// Book defaults: GFM with raw HTML allowed, as authors embed markup in
    /// intro and part header files.
    pub const fn book() -> Self {
        Self {
            gfm: true,
            raw_html: true,
        }
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(self) -> markdown::Options {
        let mut options = if self.gfm {
            markdown::Options::gfm()
        } else {
            markdown::Options::default()
        };
        options.compile.allow_dangerous_html = self.raw_html;
        options.compile.allow_dangerous_protocol = self.raw_html;
        options
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::book()
    }
}

/// markdown-rs backed renderer.
#[derive(Debug)]
pub struct MarkdownRs {
    options: markdown::Options,
}

impl MarkdownRs {
    /// Create a renderer from render options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options: options.to_markdown(),
        }
    }
}

impl Default for MarkdownRs {
    fn default() -> Self {
        Self::new(RenderOptions::book())
    }
}

impl MarkdownRenderer for MarkdownRs {
    fn render(&self, input: &str) -> Result<String, EbookError> {
        markdown::to_html_with_options(input, &self.options)
            .map_err(|err| EbookError::markdown(err.to_string(), message_location(&err)))
    }
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_images() {
        let html = MarkdownRs::default()
            .render("# Parte 1\n\n![Capa](../imagens/capa.png)\n")
            .unwrap();
        assert!(html.contains("<h1>Parte 1</h1>"), "html: {}", html);
        assert!(html.contains(r#"<img src="../imagens/capa.png" alt="Capa" />"#), "html: {}", html);
    }

    #[test]
    fn keeps_raw_html_for_book_defaults() {
        let html = MarkdownRs::default()
            .render("<div class=\"box\">x</div>\n")
            .unwrap();
        assert!(html.contains("<div class=\"box\">x</div>"), "html: {}", html);
    }

    #[test]
    fn escapes_raw_html_when_disabled() {
        let renderer = MarkdownRs::new(RenderOptions {
            raw_html: false,
            ..RenderOptions::book()
        });
        let html = renderer.render("<b>x</b>\n").unwrap();
        assert!(html.contains("&lt;b&gt;"), "html: {}", html);
    }

    #[test]
    fn closures_are_renderers() {
        let renderer = |input: &str| -> Result<String, EbookError> { Ok(format!("<p>{}</p>", input)) };
        assert_eq!(renderer.render("x").unwrap(), "<p>x</p>");
    }
}
