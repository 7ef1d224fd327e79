//! The per-build hooks object exposed to the Node host.

use crate::types::{CodeLineWarning, PageBeforeResult};
use crate::utils::{convert_error, from_json, to_json};
use folio_core::{BookConfig, Page, Summary};
use folio_ebook::EbookHooks;
use napi::{Error, Status};
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Ebook hooks for one build. Create one instance per build.
#[napi]
pub struct EbookPlugin {
    hooks: EbookHooks,
}

#[napi]
impl EbookPlugin {
    #[napi(constructor)]
    /// Creates the hooks from the book options (`book.json` plugin section
    /// merged with the host options).
    pub fn new(options: JsonValue) -> napi::Result<Self> {
        let config = BookConfig::from_json_value(options).map_err(convert_error)?;
        Ok(Self {
            hooks: EbookHooks::new(config),
        })
    }

    /// `summary:after` hook. Accepts the summary itself or the host wrapper
    /// holding it under `content`, and returns the value unchanged.
    #[napi(js_name = "summaryAfter")]
    pub fn summary_after(&mut self, summary: JsonValue) -> napi::Result<JsonValue> {
        let chapters = match summary.get("content") {
            Some(content) if content.get("chapters").is_some() => content.clone(),
            _ => summary.clone(),
        };
        let parsed: Summary = from_json(chapters, "summary")?;
        self.hooks.summary_after(parsed).map_err(convert_error)?;
        Ok(summary)
    }

    /// `page:before` hook. Returns the page as is, along with its
    /// over-long code lines for the host to print.
    #[napi(js_name = "pageBefore")]
    pub fn page_before(&self, page: JsonValue) -> napi::Result<PageBeforeResult> {
        let parsed: Page = from_json(page.clone(), "page")?;
        let warnings = self
            .hooks
            .page_before(&parsed)
            .into_iter()
            .map(CodeLineWarning::from)
            .collect();
        Ok(PageBeforeResult { page, warnings })
    }

    /// `page` hook.
    #[napi]
    pub fn page(&mut self, page: JsonValue) -> napi::Result<JsonValue> {
        let mut parsed: Page = from_json(page, "page")?;
        self.hooks.page(&mut parsed).map_err(convert_error)?;
        to_json(&parsed)
    }

    /// `page:after` hook.
    #[napi(js_name = "pageAfter")]
    pub fn page_after(&mut self, page: JsonValue) -> napi::Result<JsonValue> {
        let mut parsed: Page = from_json(page, "page")?;
        self.hooks.page_after(&mut parsed).map_err(convert_error)?;
        to_json(&parsed)
    }

    /// `ebook:before` hook: adds the conversion flags to the host options.
    #[napi(js_name = "ebookBefore")]
    pub fn ebook_before(&self, options: JsonValue) -> napi::Result<JsonValue> {
        let JsonValue::Object(mut options) = options else {
            return Err(Error::new(
                Status::InvalidArg,
                "Invalid options: expected an object".to_string(),
            ));
        };
        self.hooks.ebook_before(&mut options);
        Ok(JsonValue::Object(options))
    }

    /// Rendered intro chapters (`{title, content}`).
    #[napi]
    pub fn intro(&self) -> napi::Result<JsonValue> {
        to_json(&self.hooks.intro())
    }

    /// Parts with their numbered chapters and rendered headers.
    #[napi]
    pub fn parts(&self) -> napi::Result<JsonValue> {
        to_json(&self.hooks.parts().parts())
    }

    /// Summary annotated with numbered sections and HTML paths.
    #[napi]
    pub fn summary(&self) -> napi::Result<JsonValue> {
        to_json(self.hooks.summary())
    }
}

/// Checks fenced code lines of a Markdown source against `max` characters.
#[napi(js_name = "checkCodeLines")]
pub fn check_code_lines(source: String, file: String, max: Option<u32>) -> Vec<CodeLineWarning> {
    let max = max.map_or(folio_core::DEFAULT_MAX_LINE_LENGTH, |max| max as usize);
    folio_core::check_code_lines(&source, &file, max)
        .into_iter()
        .map(CodeLineWarning::from)
        .collect()
}
