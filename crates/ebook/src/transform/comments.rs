//! HTML comment stripping.

use super::handlers::RewriteHandlers;
use folio_core::EbookError;
use lol_html::doc_comments;

/// Removes every HTML comment from `html`.
pub fn remove_comments(html: &str) -> Result<String, EbookError> {
    let mut handlers = RewriteHandlers::new();
    handlers.push_document(doc_comments!(|comment| {
        comment.remove();
        Ok(())
    }));
    handlers.rewrite(html)
}
