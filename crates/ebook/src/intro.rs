//! Intro chapters rendered from `<input>/intro/*.md`.

use crate::transform::headings::{first_heading_text, remove_first};
use crate::transform::images::{ImageRules, image_handlers};
use crate::transform::rewrite_html;
use folio_core::{BookConfig, BookSource, EbookError, MarkdownRenderer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directory holding the intro files, relative to the book input.
pub const INTRO_DIR: &str = "intro";

/// One rendered intro file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroChapter {
    /// Text of the first `<h1>`, or empty.
    pub title: String,
    /// Rendered HTML without its title heading.
    pub content: String,
}

/// Renders every Markdown file of the intro directory, sorted by name.
///
/// EPUB and MOBI builds list the intro files in the host table of contents,
/// so nothing is rendered for them. A missing directory yields no chapters.
pub fn render_intro(
    config: &BookConfig,
    source: &dyn BookSource,
    renderer: &dyn MarkdownRenderer,
) -> Result<Vec<IntroChapter>, EbookError> {
    let format = config.output_format();
    if format.lists_intro_in_toc() {
        return Ok(Vec::new());
    }

    let Some(mut names) = source.list_dir(INTRO_DIR)? else {
        return Ok(Vec::new());
    };
    names.retain(|name| Path::new(name).extension().is_some_and(|ext| ext == "md"));
    names.sort();

    let mut chapters = Vec::with_capacity(names.len());
    for name in names {
        let path = format!("{}/{}", INTRO_DIR, name);
        let markdown = source.read_to_string(&path)?;
        let html = renderer.render(&markdown)?;

        let title = first_heading_text(&html, "h1")?.unwrap_or_default();
        let body = remove_first(&html, "h1")?;
        let content = rewrite_html(&body, image_handlers(ImageRules::new(format.clone())))?;
        chapters.push(IntroChapter { title, content });
    }
    Ok(chapters)
}
