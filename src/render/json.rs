//! JSON projection of the structural tree.

use crate::error::{Error, Result};
use crate::model::Document;

/// Serialize a document to pretty-printed JSON.
pub fn to_json(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(doc).map_err(|e| Error::Render(e.to_string()))
}
