//! Aggregates lol_html handlers and runs a rewrite over an HTML string.

use folio_core::EbookError;
use lol_html::{DocumentContentHandlers, ElementContentHandlers, RewriteStrSettings, Selector};
use std::borrow::Cow;

/// Selector/handler pair accepted by lol_html.
pub type ElementHandler = (Cow<'static, Selector>, ElementContentHandlers<'static>);

/// Builder for aggregating handlers before passing them to lol_html.
pub struct RewriteHandlers {
    elements: Vec<ElementHandler>,
    documents: Vec<DocumentContentHandlers<'static>>,
}

impl RewriteHandlers {
    /// Creates an empty handler list.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Pushes a single element handler.
    pub fn push(&mut self, handler: ElementHandler) {
        self.elements.push(handler);
    }

    /// Extends the list with more element handlers.
    pub fn extend(&mut self, handlers: Vec<ElementHandler>) {
        self.elements.extend(handlers);
    }

    /// Pushes a document-level handler (comments, doctype, end of input).
    pub fn push_document(&mut self, handler: DocumentContentHandlers<'static>) {
        self.documents.push(handler);
    }

    /// Whether no handler was registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.documents.is_empty()
    }

    /// Runs the handlers over `html`.
    pub fn rewrite(self, html: &str) -> Result<String, EbookError> {
        if self.is_empty() {
            return Ok(html.to_string());
        }

        lol_html::rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: self.elements,
                document_content_handlers: self.documents,
                ..RewriteStrSettings::new()
            },
        )
        .map_err(|err| EbookError::Rewrite(err.to_string()))
    }
}

impl Default for RewriteHandlers {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a single batch of element handlers over `html`.
pub fn rewrite_html(html: &str, handlers: Vec<ElementHandler>) -> Result<String, EbookError> {
    let mut builder = RewriteHandlers::new();
    builder.extend(handlers);
    builder.rewrite(html)
}
