//! Page hooks: section numbering and figures before templating, part headers
//! and chapter banners after it.

use crate::parts::PartIndex;
use crate::transform::comments::remove_comments;
use crate::transform::headings::number_sections;
use crate::transform::images::{ImageRules, wrap_figures};
use crate::transform::page_chrome::{
    banner_before_title, chapter_banner, part_header_block, prepend_to_page,
};
use crate::transform::rewrite_html;
use folio_core::{BookConfig, EbookError, Page, ROOT_CHAPTER, SectionRef, Summary};
use std::collections::HashSet;

/// Rewrites the `normal` sections of a rendered page.
///
/// Level-2 headings are numbered (except in intro chapters) and recorded on
/// the summary entry of the chapter, images become numbered figures and
/// comments are dropped. Fails when the chapter title starts with a digit.
pub fn transform_page(
    config: &BookConfig,
    summary: &mut Summary,
    page: &mut Page,
) -> Result<(), EbookError> {
    let chapter = page.chapter().clone();
    if chapter.title_starts_with_digit() {
        return Err(EbookError::ChapterTitle {
            title: chapter.title,
        });
    }

    let intro = config.is_intro_chapter(&chapter);
    let chapter_number = config.chapter_number(&chapter);
    let rules = ImageRules::new(config.output_format()).strip_parent_dir(
        chapter.path == ROOT_CHAPTER && config.first_chapter_in_subdirectory(),
    );

    for section in page.sections.iter_mut().filter(|section| section.is_normal()) {
        let mut html = section.content.clone();
        if !intro {
            let (numbered, sections) = number_sections(&html, chapter_number)?;
            annotate_summary(config, summary, &chapter.path, sections);
            html = numbered;
        }
        let html = wrap_figures(&html, rules.clone(), chapter_number)?;
        section.content = remove_comments(&html)?;
    }
    Ok(())
}

fn annotate_summary(
    config: &BookConfig,
    summary: &mut Summary,
    path: &str,
    sections: Vec<SectionRef>,
) {
    match summary.chapter_mut(path) {
        Some(entry) => {
            entry.html_path = Some(config.chapter_html_path(&entry.path));
            entry.sections = Some(sections);
        }
        None => log::debug!("no summary entry for {}, sections not recorded", path),
    }
}

/// Adds the part header and the chapter banner to a templated page.
///
/// The header of a part goes into the page of the part's first chapter,
/// whatever order the pages arrive in; `inserted` holds the titles of parts
/// already placed in this build.
pub fn finish_page(
    config: &BookConfig,
    parts: &PartIndex,
    inserted: &mut HashSet<String>,
    page: &mut Page,
) -> Result<(), EbookError> {
    let chapter = page.chapter();
    let mut handlers = Vec::new();

    let new_part = parts.part_for(&chapter.path).filter(|part| {
        part.first_chapter_path() == Some(chapter.path.as_str()) && !inserted.contains(&part.title)
    });
    if let Some(part) = new_part {
        handlers.push(prepend_to_page(part_header_block(&part.part_header_html)));
    }

    if !config.is_intro_chapter(chapter) {
        handlers.push(banner_before_title(chapter_banner(
            config.chapter_number(chapter),
        )));
    }

    page.content = rewrite_html(&page.content, handlers)?;
    if let Some(part) = new_part {
        inserted.insert(part.title.clone());
    }
    Ok(())
}
