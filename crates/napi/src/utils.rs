//! Error and JSON conversions at the Node boundary.

use folio_core::EbookError;
use napi::{Error, Status};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Maps hook errors to NAPI errors; bad input becomes `InvalidArg`.
pub(crate) fn convert_error(err: EbookError) -> Error {
    match err {
        EbookError::ChapterTitle { .. } | EbookError::Config(_) => {
            Error::new(Status::InvalidArg, err.to_string())
        }
        EbookError::Io { .. } | EbookError::Markdown { .. } | EbookError::Rewrite(_) => {
            Error::from_reason(err.to_string())
        }
    }
}

/// Decodes a host value, naming what was expected on failure.
pub(crate) fn from_json<T: DeserializeOwned>(value: JsonValue, what: &str) -> napi::Result<T> {
    serde_json::from_value(value)
        .map_err(|err| Error::new(Status::InvalidArg, format!("Invalid {}: {}", what, err)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> napi::Result<JsonValue> {
    serde_json::to_value(value)
        .map_err(|err| Error::from_reason(format!("Serialization error: {}", err)))
}
