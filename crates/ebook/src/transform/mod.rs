//! HTML rewrites applied by the hooks.
//!
//! - `handlers`: handler aggregation and the lol_html entry point.
//! - `headings`: numbered level-2 sections and heading text extraction.
//! - `images`: image path fix-ups, widths and numbered figures.
//! - `implied_end`: end tags the HTML left out.
//! - `comments`: comment stripping.
//! - `page_chrome`: part headers and chapter banners on finished pages.

/// HTML comment stripping.
pub mod comments;
/// Handler aggregation and the lol_html entry point.
pub mod handlers;
/// Heading numbering and extraction.
pub mod headings;
/// Image rewrites and figures.
pub mod images;
/// Omitted end tags.
pub mod implied_end;
/// Part headers and chapter banners.
pub mod page_chrome;

pub use handlers::{ElementHandler, RewriteHandlers, rewrite_html};
