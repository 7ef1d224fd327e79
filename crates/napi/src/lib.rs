#![deny(missing_docs)]
//! Node.js bindings that surface the folio ebook hooks.

/// The per-build hooks class.
pub mod plugin;
/// NAPI-exposed data structures.
pub mod types;
/// Error and JSON conversions.
mod utils;

pub use plugin::*;
pub use types::*;
