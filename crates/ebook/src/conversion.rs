//! Command-line flags for the ebook conversion backend.

use folio_core::{BookConfig, OutputFormat};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Table of contents title for MOBI output.
pub const TOC_TITLE: &str = "Sumário";

/// Matches the first-level chapter title emitted by the page template.
pub const CHAPTER_TOC_XPATH: &str =
    "descendant-or-self::*[contains(concat(' ', normalize-space(@class), ' '), ' book-chapter-1 ')]";
/// Matches the title of a part header.
pub const PART_TOC_XPATH: &str = "//*[@class='part-header']/h:h1[1]";
/// Matches level-2 section headings.
pub const SECTION_TOC_XPATH: &str = "//h:h2";

/// Value of one backend flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Flag with an argument.
    Text(String),
    /// Boolean switch.
    Switch(bool),
    /// Flag not passed; clears a host default. Serialized as `null`.
    Omit,
}

impl FlagValue {
    fn text_or_omit(value: Option<&str>) -> Self {
        value.map_or(Self::Omit, |value| Self::Text(value.to_string()))
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Switch(value)
    }
}

/// Flags keyed by their command-line name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversionOptions {
    flags: BTreeMap<String, FlagValue>,
}

impl ConversionOptions {
    /// Sets a flag, replacing any previous value.
    pub fn set(&mut self, flag: &str, value: impl Into<FlagValue>) {
        self.flags.insert(flag.to_string(), value.into());
    }

    /// Value of a flag.
    pub fn get(&self, flag: &str) -> Option<&FlagValue> {
        self.flags.get(flag)
    }

    /// Flags sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.flags.iter().map(|(flag, value)| (flag.as_str(), value))
    }

    /// JSON object of the flags.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.to_map())
    }

    /// Writes the flags into a host option map, overwriting existing keys.
    pub fn merge_into(&self, options: &mut Map<String, JsonValue>) {
        options.extend(self.to_map());
    }

    fn to_map(&self) -> Map<String, JsonValue> {
        self.flags
            .iter()
            .map(|(flag, value)| {
                let value = match value {
                    FlagValue::Text(text) => JsonValue::String(text.clone()),
                    FlagValue::Switch(on) => JsonValue::Bool(*on),
                    FlagValue::Omit => JsonValue::Null,
                };
                (flag.clone(), value)
            })
            .collect()
    }
}

/// Builds the backend flags for a book.
pub fn conversion_options(config: &BookConfig) -> ConversionOptions {
    let mut options = ConversionOptions::default();

    options.set("--publisher", FlagValue::text_or_omit(config.publisher.as_deref()));
    options.set("--chapter-mark", "none");

    if config.has_parts() {
        options.set("--level1-toc", PART_TOC_XPATH);
        options.set("--level2-toc", CHAPTER_TOC_XPATH);
        options.set("--level3-toc", SECTION_TOC_XPATH);
    } else {
        options.set("--level1-toc", CHAPTER_TOC_XPATH);
        options.set("--level2-toc", SECTION_TOC_XPATH);
        options.set("--level3-toc", FlagValue::Omit);
    }

    match config.output_format() {
        OutputFormat::Mobi => {
            options.set("--mobi-keep-original-images", true);
            options.set("--toc-title", TOC_TITLE);
        }
        OutputFormat::Pdf => {
            options.set("--pdf-page-numbers", FlagValue::Omit);
            options.set("--disable-font-rescaling", true);
            options.set("--paper-size", FlagValue::Omit);
            options.set(
                "--custom-size",
                FlagValue::text_or_omit(config.pdf.custom_size.as_deref()),
            );
            options.set("--unit", "millimeter");
        }
        OutputFormat::Epub | OutputFormat::Other(_) => {}
    }

    options.set("--pdf-header-template", FlagValue::Omit);
    options.set("--pdf-footer-template", FlagValue::Omit);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::PdfConfig;
    use serde_json::json;

    fn config(format: OutputFormat) -> BookConfig {
        BookConfig {
            format: Some(format),
            publisher: Some("Casa do Código".to_string()),
            ..BookConfig::default()
        }
    }

    #[test]
    fn common_flags_without_parts() {
        let options = conversion_options(&config(OutputFormat::Epub));

        assert_eq!(options.get("--publisher"), Some(&FlagValue::from("Casa do Código")));
        assert_eq!(options.get("--chapter-mark"), Some(&FlagValue::from("none")));
        assert_eq!(options.get("--level1-toc"), Some(&FlagValue::from(CHAPTER_TOC_XPATH)));
        assert_eq!(options.get("--level2-toc"), Some(&FlagValue::from("//h:h2")));
        assert_eq!(options.get("--level3-toc"), Some(&FlagValue::Omit));
        assert_eq!(options.get("--pdf-header-template"), Some(&FlagValue::Omit));
        assert_eq!(options.get("--pdf-footer-template"), Some(&FlagValue::Omit));
        assert_eq!(options.get("--toc-title"), None);
        assert_eq!(options.get("--unit"), None);
    }

    #[test]
    fn parts_shift_toc_levels() {
        let config = BookConfig {
            part_headers: vec!["part-1/header.md".to_string()],
            ..config(OutputFormat::Epub)
        };
        let options = conversion_options(&config);
        assert_eq!(options.get("--level1-toc"), Some(&FlagValue::from(PART_TOC_XPATH)));
        assert_eq!(options.get("--level2-toc"), Some(&FlagValue::from(CHAPTER_TOC_XPATH)));
        assert_eq!(options.get("--level3-toc"), Some(&FlagValue::from(SECTION_TOC_XPATH)));
    }

    #[test]
    fn mobi_keeps_images_and_titles_toc() {
        let options = conversion_options(&config(OutputFormat::Mobi));
        assert_eq!(options.get("--mobi-keep-original-images"), Some(&FlagValue::Switch(true)));
        assert_eq!(options.get("--toc-title"), Some(&FlagValue::from("Sumário")));
        assert_eq!(options.get("--custom-size"), None);
    }

    #[test]
    fn pdf_sets_page_geometry() {
        let config = BookConfig {
            pdf: PdfConfig {
                custom_size: Some("155x230".to_string()),
            },
            ..config(OutputFormat::Pdf)
        };
        let json = conversion_options(&config).to_json();

        assert_eq!(json["--pdf-page-numbers"], JsonValue::Null);
        assert_eq!(json["--disable-font-rescaling"], json!(true));
        assert_eq!(json["--paper-size"], JsonValue::Null);
        assert_eq!(json["--custom-size"], json!("155x230"));
        assert_eq!(json["--unit"], json!("millimeter"));
        assert!(json.get("--mobi-keep-original-images").is_none());
    }

    #[test]
    fn missing_values_are_omitted() {
        let config = BookConfig {
            publisher: None,
            ..config(OutputFormat::Pdf)
        };
        let options = conversion_options(&config);
        assert_eq!(options.get("--publisher"), Some(&FlagValue::Omit));
        assert_eq!(options.get("--custom-size"), Some(&FlagValue::Omit));
    }

    #[test]
    fn merge_overwrites_host_options() {
        let mut host = json!({ "--chapter-mark": "pagebreak", "--margin-top": 10 });
        let map = host.as_object_mut().unwrap();
        conversion_options(&config(OutputFormat::Epub)).merge_into(map);

        assert_eq!(host["--chapter-mark"], json!("none"));
        assert_eq!(host["--margin-top"], json!(10));
        assert_eq!(host["--level3-toc"], JsonValue::Null);
    }

    #[test]
    fn serializes_like_the_json_view() {
        let options = conversion_options(&config(OutputFormat::Mobi));
        assert_eq!(serde_json::to_value(&options).unwrap(), options.to_json());
    }
}
