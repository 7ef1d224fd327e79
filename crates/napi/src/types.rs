//! NAPI-exposed data structures.

use folio_core::LineLengthWarning;
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Over-long line inside a fenced code block.
#[napi(object)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLineWarning {
    /// File label (root chapter mapped to its configured path).
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// Line length in characters.
    pub length: u32,
    /// Allowed maximum.
    pub max: u32,
    /// Start of the trimmed line.
    pub excerpt: String,
    /// `file:line:column` of the line.
    pub location: String,
    /// Printable warning.
    pub message: String,
}

/// Result of the `pageBefore` hook.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct PageBeforeResult {
    /// The page, unchanged.
    pub page: JsonValue,
    /// Over-long code lines of the page source.
    pub warnings: Vec<CodeLineWarning>,
}

impl From<LineLengthWarning> for CodeLineWarning {
    fn from(warning: LineLengthWarning) -> Self {
        let message = warning.to_string();
        let location = warning.location().to_string();
        Self {
            file: warning.file,
            line: saturate(warning.line),
            length: saturate(warning.length),
            max: saturate(warning.max),
            excerpt: warning.excerpt,
            location,
            message,
        }
    }
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
