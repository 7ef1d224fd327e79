//! Book structures exchanged with the host: chapters, the summary and pages.
//!
//! Unknown host fields are kept in `extra` maps so a page or summary can be
//! handed back to the host after the hooks ran.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Section type the page transformer rewrites; other types pass through.
pub const NORMAL_SECTION: &str = "normal";

/// One Markdown-derived page of the book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Markdown file, relative to the book input directory.
    pub path: String,
    /// Title as listed in the summary.
    #[serde(default)]
    pub title: String,
    /// Nesting level (`"3"`, `"3.1"`, or a bare number).
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: String,
}

impl Chapter {
    /// Leading integer component of the level (`"3.1"` → 3).
    pub fn level_number(&self) -> i64 {
        self.level
            .split('.')
            .next()
            .and_then(|head| head.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Whether the title starts with an ASCII digit.
    pub fn title_starts_with_digit(&self) -> bool {
        self.title.starts_with(|c: char| c.is_ascii_digit())
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(level) => Ok(level),
        JsonValue::Number(level) => Ok(level.to_string()),
        JsonValue::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "invalid chapter level: {}",
            other
        ))),
    }
}

/// Title and anchor of a numbered level-2 section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    /// Numbered title, e.g. `2.1 Instalação`.
    pub title: String,
    /// Anchor copied from the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Table of contents entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryChapter {
    /// Markdown file of the chapter.
    pub path: String,
    /// Chapter title.
    #[serde(default)]
    pub title: String,
    /// Nesting level.
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: String,
    /// Numbered sections, filled in by the page transformer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionRef>>,
    /// Output file of the chapter, filled in by the page transformer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_path: Option<String>,
    /// Host fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl SummaryChapter {
    /// Chapter view of this entry.
    pub fn chapter(&self) -> Chapter {
        Chapter {
            path: self.path.clone(),
            title: self.title.clone(),
            level: self.level.clone(),
        }
    }
}

/// Book table of contents, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Chapters in traversal order.
    #[serde(default)]
    pub chapters: Vec<SummaryChapter>,
    /// Host fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Summary {
    /// Finds the entry for a chapter path.
    pub fn chapter_mut(&mut self, path: &str) -> Option<&mut SummaryChapter> {
        self.chapters.iter_mut().find(|chapter| chapter.path == path)
    }
}

/// Rendered fragment of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    /// Fragment kind (`normal`, `exercise`, `quiz`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// HTML content.
    #[serde(default)]
    pub content: String,
    /// Host fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl PageSection {
    /// Creates a `normal` section.
    pub fn normal(content: impl Into<String>) -> Self {
        Self {
            kind: NORMAL_SECTION.to_string(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    /// Whether the page transformer rewrites this section.
    pub fn is_normal(&self) -> bool {
        self.kind == NORMAL_SECTION
    }
}

/// Position of a page inside the book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageProgress {
    /// Chapter the page belongs to.
    pub current: Chapter,
    /// Host fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// A page as passed through the page hooks.
///
/// `content` holds the raw Markdown before rendering and the templated page
/// HTML after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Markdown file of the page.
    pub path: String,
    /// Raw source or rendered page, depending on the hook.
    #[serde(default)]
    pub content: String,
    /// Rendered fragments.
    #[serde(default)]
    pub sections: Vec<PageSection>,
    /// Owning chapter.
    #[serde(default)]
    pub progress: PageProgress,
    /// Host fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Page {
    /// Chapter the page belongs to.
    pub fn chapter(&self) -> &Chapter {
        &self.progress.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_level_from_string_or_number() {
        let chapter: Chapter =
            serde_json::from_value(json!({ "path": "a.md", "title": "A", "level": "3.1" }))
                .unwrap();
        assert_eq!(chapter.level_number(), 3);

        let chapter: Chapter =
            serde_json::from_value(json!({ "path": "a.md", "title": "A", "level": 4 })).unwrap();
        assert_eq!(chapter.level_number(), 4);
    }

    #[test]
    fn detects_leading_digit_titles() {
        let mut chapter = Chapter {
            path: "a.md".to_string(),
            title: "2 Instalação".to_string(),
            level: "2".to_string(),
        };
        assert!(chapter.title_starts_with_digit());

        chapter.title = "Instalação 2".to_string();
        assert!(!chapter.title_starts_with_digit());
    }

    #[test]
    fn page_round_trip_keeps_host_fields() {
        let input = json!({
            "path": "cap1.md",
            "content": "# Cap",
            "sections": [{ "type": "normal", "content": "<p>x</p>", "id": "s1" }],
            "progress": {
                "current": { "path": "cap1.md", "title": "Cap", "level": "1" },
                "percent": 10
            },
            "type": "markdown"
        });

        let page: Page = serde_json::from_value(input.clone()).unwrap();
        assert!(page.sections[0].is_normal());
        assert_eq!(page.chapter().title, "Cap");

        let output = serde_json::to_value(&page).unwrap();
        assert_eq!(output["type"], "markdown");
        assert_eq!(output["sections"][0]["id"], "s1");
        assert_eq!(output["progress"]["percent"], 10);
    }

    #[test]
    fn summary_annotations_serialize_camel_case() {
        let mut summary: Summary = serde_json::from_value(json!({
            "chapters": [{ "path": "cap1.md", "title": "Cap", "level": "1" }]
        }))
        .unwrap();

        let entry = summary.chapter_mut("cap1.md").unwrap();
        entry.html_path = Some("cap1.html".to_string());
        entry.sections = Some(vec![SectionRef {
            title: "1.1 Intro".to_string(),
            id: Some("intro".to_string()),
        }]);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["chapters"][0]["htmlPath"], "cap1.html");
        assert_eq!(value["chapters"][0]["sections"][0]["id"], "intro");
        assert!(summary.chapter_mut("missing.md").is_none());
    }
}
