#![deny(missing_docs)]
//! folio core: book model, configuration, markdown rendering and code fence checks.

/// Code fence tracking and the code line length check.
pub mod code_fence;
/// Book configuration.
pub mod config;
/// Core error and warning types.
pub mod error;
/// Chapters, summary and pages exchanged with the host.
pub mod model;
/// Markdown to HTML rendering.
pub mod render;
/// Access to book files.
pub mod source;

pub use code_fence::{FencePhase, advance_fence_state, check_code_lines};
pub use config::{BookConfig, DEFAULT_MAX_LINE_LENGTH, OutputFormat, PdfConfig, ROOT_CHAPTER};
pub use error::{EbookError, LineLengthWarning, SourceLocation};
pub use model::{Chapter, Page, PageProgress, PageSection, SectionRef, Summary, SummaryChapter};
pub use render::{MarkdownRenderer, MarkdownRs, RenderOptions};
pub use source::{BookSource, FsSource, MemorySource};
