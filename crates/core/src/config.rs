//! Book configuration as read from the plugin options of `book.json`.

use crate::EbookError;
use crate::model::Chapter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Path the host gives to the book's root chapter.
pub const ROOT_CHAPTER: &str = "README.md";

/// Default maximum length of a line inside a fenced code block.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Ebook target produced by the conversion backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    /// Portable document format.
    Pdf,
    /// EPUB container.
    Epub,
    /// Kindle MOBI.
    Mobi,
    /// Any other target (website, json, ...); left untouched by format rules.
    Other(String),
}

impl OutputFormat {
    /// Derives the format from an output file path extension.
    pub fn from_path(path: &str) -> Option<Self> {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from)
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Epub => "epub",
            Self::Mobi => "mobi",
            Self::Other(name) => name,
        }
    }

    /// EPUB and MOBI list intro files in the host table of contents.
    pub fn lists_intro_in_toc(&self) -> bool {
        matches!(self, Self::Epub | Self::Mobi)
    }
}

impl From<&str> for OutputFormat {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "epub" => Self::Epub,
            "mobi" => Self::Mobi,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PDF-only settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfConfig {
    /// Page size in millimeters, e.g. `155x230`.
    pub custom_size: Option<String>,
}

/// Book-level options consumed by every hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookConfig {
    /// Book input directory (holds `intro/` and the part header files).
    pub input: PathBuf,
    /// Output file; its extension selects the format when `format` is unset.
    pub output: Option<String>,
    /// Explicit output format.
    pub format: Option<OutputFormat>,
    /// Path (without `.md`) the root chapter is published under.
    pub first_chapter: String,
    /// Number of intro chapters preceding the numbered ones.
    pub num_intro_chapters: u32,
    /// Markdown files holding the part headers, one per `part-*` directory.
    pub part_headers: Vec<String>,
    /// Publisher passed to the conversion backend.
    pub publisher: Option<String>,
    /// PDF settings.
    pub pdf: PdfConfig,
    /// Maximum length of a line inside a fenced code block.
    pub max_line_length: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: None,
            format: None,
            first_chapter: "README".to_string(),
            num_intro_chapters: 0,
            part_headers: Vec::new(),
            publisher: None,
            pdf: PdfConfig::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl BookConfig {
    /// Parses the configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, EbookError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the configuration from a JSON value handed over by the host.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, EbookError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EbookError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| EbookError::io(path.display().to_string(), err))?;
        Self::from_json_str(&json)
    }

    /// Output format, from `format` or else the `output` extension.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .clone()
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or_else(|| OutputFormat::Other(String::new()))
    }

    /// Whether the book declares part header files.
    pub fn has_parts(&self) -> bool {
        !self.part_headers.is_empty()
    }

    /// Whether the configured first chapter lives inside a directory.
    pub fn first_chapter_in_subdirectory(&self) -> bool {
        self.first_chapter.find('/').is_some_and(|pos| pos > 0)
    }

    /// Source path of a chapter, with the root chapter mapped to its
    /// configured location.
    pub fn effective_chapter_path<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if path == ROOT_CHAPTER {
            Cow::Owned(format!("{}.md", self.first_chapter))
        } else {
            Cow::Borrowed(path)
        }
    }

    /// Output HTML path of a chapter.
    pub fn chapter_html_path(&self, path: &str) -> String {
        if path == ROOT_CHAPTER {
            format!("{}.html", self.first_chapter)
        } else {
            path.replacen(".md", ".html", 1)
        }
    }

    /// Visible chapter number: nesting level minus intro chapters, plus one.
    pub fn chapter_number(&self, chapter: &Chapter) -> i64 {
        chapter.level_number() - i64::from(self.num_intro_chapters) + 1
    }

    /// Intro chapters sit outside the numbering when the format lists them
    /// in the host table of contents.
    pub fn is_intro_chapter(&self, chapter: &Chapter) -> bool {
        self.output_format().lists_intro_in_toc()
            && self.num_intro_chapters > 0
            && (chapter.path == ROOT_CHAPTER || chapter.path.starts_with("intro"))
    }
}
