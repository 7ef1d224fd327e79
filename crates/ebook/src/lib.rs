#![deny(missing_docs)]
//! folio ebook hooks: section numbering, figures, parts, intro chapters and
//! conversion flags for a GitBook-style ebook build.

/// Conversion backend flags.
pub mod conversion;
/// Per-build state and hook entry points.
pub mod hooks;
/// Intro chapters.
pub mod intro;
/// Page transformer and finisher.
pub mod page;
/// Part grouping.
pub mod parts;
/// HTML rewrites.
pub mod transform;

pub use conversion::{ConversionOptions, FlagValue, TOC_TITLE, conversion_options};
pub use hooks::EbookHooks;
pub use intro::{IntroChapter, render_intro};
pub use page::{finish_page, transform_page};
pub use parts::{Part, PartChapter, PartIndex, render_parts};
