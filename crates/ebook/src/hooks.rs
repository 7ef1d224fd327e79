//! Per-build state and one entry point per host hook.

use crate::conversion::{ConversionOptions, conversion_options};
use crate::intro::{IntroChapter, render_intro};
use crate::page::{finish_page, transform_page};
use crate::parts::{PartIndex, render_parts};
use folio_core::{
    BookConfig, BookSource, EbookError, FsSource, LineLengthWarning, MarkdownRenderer, MarkdownRs,
    Page, Summary, check_code_lines,
};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

/// Ebook hooks for one build.
///
/// The host calls [`summary_after`](Self::summary_after) once, then
/// [`page_before`](Self::page_before), [`page`](Self::page) and
/// [`page_after`](Self::page_after) for every page in summary order, and
/// finally [`ebook_before`](Self::ebook_before).
pub struct EbookHooks {
    config: BookConfig,
    renderer: Box<dyn MarkdownRenderer>,
    source: Box<dyn BookSource>,
    intro: Vec<IntroChapter>,
    parts: PartIndex,
    summary: Summary,
    inserted_parts: HashSet<String>,
}

impl EbookHooks {
    /// Hooks reading book files from `config.input`, rendering with the
    /// default markdown-rs options.
    pub fn new(config: BookConfig) -> Self {
        let source = FsSource::new(config.input.clone());
        Self {
            config,
            renderer: Box::new(MarkdownRs::default()),
            source: Box::new(source),
            intro: Vec::new(),
            parts: PartIndex::default(),
            summary: Summary::default(),
            inserted_parts: HashSet::new(),
        }
    }

    /// Replaces the source of intro and part header files.
    pub fn with_source(mut self, source: impl BookSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replaces the Markdown renderer.
    pub fn with_renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Book configuration.
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// `summary:after`: keeps the summary, renders intro files and parts.
    pub fn summary_after(&mut self, summary: Summary) -> Result<&Summary, EbookError> {
        self.intro = render_intro(&self.config, self.source.as_ref(), self.renderer.as_ref())?;
        self.parts = render_parts(
            &summary,
            &self.config,
            self.source.as_ref(),
            self.renderer.as_ref(),
        )?;
        log::debug!(
            "{} intro chapters, {} parts",
            self.intro.len(),
            self.parts.parts().len()
        );
        self.summary = summary;
        Ok(&self.summary)
    }

    /// `page:before`: reports over-long lines in fenced code blocks of the
    /// raw page source. The page is left untouched.
    pub fn page_before(&self, page: &Page) -> Vec<LineLengthWarning> {
        let file = self.config.effective_chapter_path(&page.path);
        check_code_lines(&page.content, &file, self.config.max_line_length)
    }

    /// `page`: numbers sections, builds figures and strips comments.
    pub fn page(&mut self, page: &mut Page) -> Result<(), EbookError> {
        transform_page(&self.config, &mut self.summary, page)
    }

    /// `page:after`: adds the part header and the chapter banner.
    pub fn page_after(&mut self, page: &mut Page) -> Result<(), EbookError> {
        finish_page(&self.config, &self.parts, &mut self.inserted_parts, page)
    }

    /// `ebook:before`: writes the conversion flags into the host options.
    pub fn ebook_before(&self, options: &mut Map<String, JsonValue>) -> ConversionOptions {
        let flags = conversion_options(&self.config);
        flags.merge_into(options);
        flags
    }

    /// Rendered intro chapters.
    pub fn intro(&self) -> &[IntroChapter] {
        &self.intro
    }

    /// Parts of the book.
    pub fn parts(&self) -> &PartIndex {
        &self.parts
    }

    /// Summary annotated with sections and output paths.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Titles of parts whose header was already placed on a page.
    pub fn inserted_parts(&self) -> &HashSet<String> {
        &self.inserted_parts
    }
}

impl std::fmt::Debug for EbookHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EbookHooks")
            .field("config", &self.config)
            .field("intro", &self.intro)
            .field("parts", &self.parts)
            .field("inserted_parts", &self.inserted_parts)
            .finish_non_exhaustive()
    }
}
