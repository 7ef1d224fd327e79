use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised by the ebook hooks.
#[derive(Debug, Error)]
pub enum EbookError {
    /// A chapter title starts with a digit, which would clash with the
    /// generated chapter numbering.
    #[error("Chapter can't begin with numbers: {title}")]
    ChapterTitle {
        /// Offending chapter title
        title: String,
    },
    /// Reading a book source file failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path relative to the book input directory
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// markdown-rs reported an error while rendering.
    #[error("Markdown error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The HTML rewriter rejected the input or a handler failed.
    #[error("HTML rewrite error: {0}")]
    Rewrite(String),
    /// Configuration or host data could not be decoded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EbookError {
    /// Create an IO error tagged with the path being read
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a markdown error with location
    pub fn markdown(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Markdown {
            message: message.into(),
            location,
        }
    }
}

impl From<serde_json::Error> for EbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A code line inside a fenced block that is longer than allowed.
///
/// Not fatal: the page is left untouched and the build goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLengthWarning {
    /// File label (the root chapter is reported under its configured path)
    pub file: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Length of the offending line, in characters
    pub length: usize,
    /// Configured maximum
    pub max: usize,
    /// First 30 characters of the trimmed line
    pub excerpt: String,
}

impl LineLengthWarning {
    /// Location of the offending line
    pub fn location(&self) -> SourceLocation {
        SourceLocation::with_file(self.file.clone(), self.line, 1)
    }
}

impl std::fmt::Display for LineLengthWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "warning: code \"{}\"... too long. was {} (max {}) in {}:{}",
            self.excerpt, self.length, self.max, self.file, self.line
        )
    }
}
