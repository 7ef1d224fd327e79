//! Parts: chapters of one `part-*` directory grouped under a header page.

use crate::transform::headings::first_heading_text;
use crate::transform::images::{ImageRules, image_handlers};
use crate::transform::rewrite_html;
use folio_core::{BookConfig, BookSource, EbookError, MarkdownRenderer, ROOT_CHAPTER, Summary};
use serde::Serialize;
use std::collections::HashMap;

/// Directory prefix marking chapters that belong to a part.
pub const PART_DIR_PREFIX: &str = "part-";

/// A chapter listed on a part page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartChapter {
    /// Running number, shared across all parts.
    pub number: u32,
    /// `"<number> <chapter title>"`.
    pub title: String,
    /// Chapter path as listed in the summary.
    pub path: String,
}

/// A group of chapters sharing a header file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text of the header's first `<h1>`.
    pub title: String,
    /// Chapters in summary order.
    pub chapters: Vec<PartChapter>,
    /// Header file, relative to the book input.
    pub part_header_path: String,
    /// Rendered header.
    pub part_header_html: String,
}

impl Part {
    /// Path of the chapter that opened the part.
    pub fn first_chapter_path(&self) -> Option<&str> {
        self.chapters.first().map(|chapter| chapter.path.as_str())
    }
}

/// Parts of a book and the part each chapter belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartIndex {
    parts: Vec<Part>,
    #[serde(skip)]
    by_chapter: HashMap<String, usize>,
}

impl PartIndex {
    /// Parts in the order their first chapter appears.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Part holding the chapter at `path`.
    pub fn part_for(&self, path: &str) -> Option<&Part> {
        self.by_chapter.get(path).map(|&index| &self.parts[index])
    }

    /// Whether the book has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// POSIX dirname of a `/`-separated path.
fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/",
        Some(pos) => &trimmed[..pos],
        None if path.starts_with('/') => "/",
        None => ".",
    }
}

/// Groups the summary chapters into parts.
///
/// Only chapters whose directory starts with `part-` and matches the
/// directory of a declared header file are included. The first such chapter
/// renders the header; every included chapter gets the next running number.
pub fn render_parts(
    summary: &Summary,
    config: &BookConfig,
    source: &dyn BookSource,
    renderer: &dyn MarkdownRenderer,
) -> Result<PartIndex, EbookError> {
    let mut index = PartIndex::default();
    if !config.has_parts() {
        return Ok(index);
    }

    let format = config.output_format();
    let mut by_header: HashMap<&str, usize> = HashMap::new();
    let mut counter: u32 = 0;

    for chapter in &summary.chapters {
        let chapter_path = config.effective_chapter_path(&chapter.path);
        let chapter_dir = dirname(&chapter_path);
        if !chapter_dir.starts_with(PART_DIR_PREFIX) {
            continue;
        }

        let Some(header_path) = config
            .part_headers
            .iter()
            .find(|header| dirname(header) == chapter_dir)
        else {
            continue;
        };

        let part_index = match by_header.get(header_path.as_str()) {
            Some(&part_index) => part_index,
            None => {
                let markdown = source.read_to_string(header_path)?;
                let html = renderer.render(&markdown)?;
                let title = first_heading_text(&html, "h1")?.unwrap_or_default();
                let rules =
                    ImageRules::new(format.clone()).strip_parent_dir(chapter.path == ROOT_CHAPTER);
                let part_header_html = rewrite_html(&html, image_handlers(rules))?;

                index.parts.push(Part {
                    title,
                    chapters: Vec::new(),
                    part_header_path: header_path.clone(),
                    part_header_html,
                });
                let part_index = index.parts.len() - 1;
                by_header.insert(header_path.as_str(), part_index);
                part_index
            }
        };

        counter += 1;
        index.parts[part_index].chapters.push(PartChapter {
            number: counter,
            title: format!("{} {}", counter, chapter.title),
            path: chapter.path.clone(),
        });
        index.by_chapter.insert(chapter.path.clone(), part_index);
    }

    Ok(index)
}
