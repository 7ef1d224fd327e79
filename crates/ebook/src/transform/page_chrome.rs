//! Blocks added around the templated page: part headers and chapter banners.

use super::handlers::ElementHandler;
use lol_html::element;
use lol_html::html_content::ContentType;

/// Label of the chapter banner.
pub const CHAPTER_HEADER_TITLE: &str = "Capítulo ";

/// Wraps a rendered part header for insertion into a page.
pub fn part_header_block(header_html: &str) -> String {
    format!("<div class=\"part-header\">\n{}</div>\n", header_html)
}

/// Chapter banner placed before the chapter title.
pub fn chapter_banner(chapter_number: i64) -> String {
    format!(
        "<div class=\"chapterHeader\">{}{}</div>",
        CHAPTER_HEADER_TITLE, chapter_number
    )
}

/// Prepends `block` to the first `.page` container. Later `.page` elements
/// are left alone so a part title appears once in the table of contents.
pub fn prepend_to_page(block: String) -> ElementHandler {
    let mut pending = Some(block);
    element!(".page", move |el| {
        if let Some(block) = pending.take() {
            el.prepend(&block, ContentType::Html);
        }
        Ok(())
    })
}

/// Inserts `banner` before every chapter title heading.
pub fn banner_before_title(banner: String) -> ElementHandler {
    element!("h1.book-chapter", move |el| {
        el.before(&banner, ContentType::Html);
        Ok(())
    })
}
