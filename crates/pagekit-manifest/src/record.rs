//! Page records stored in the manifest.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single page known to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page identifier. Doubles as the build tool's chunk name and the page
    /// directory below the pages directory (may be nested, e.g. `a/b/c`).
    pub chunk: String,

    /// Display name shown on the landing page.
    ///
    /// `None` when the key is absent, `Some(None)` for an explicit `null`, so both
    /// survive a rewrite unchanged.
    #[serde(
        rename = "chunkName",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub chunk_name: Option<Option<String>>,

    /// Hand-written fields we don't model, kept as-is on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageRecord {
    /// Create a record. An empty display name falls back to the identifier.
    pub fn new(chunk: impl Into<String>, chunk_name: impl Into<String>) -> Self {
        let chunk = chunk.into();
        let chunk_name = chunk_name.into();
        let chunk_name = if chunk_name.is_empty() {
            chunk.clone()
        } else {
            chunk_name
        };

        Self {
            chunk,
            chunk_name: Some(Some(chunk_name)),
            extra: Map::new(),
        }
    }

    /// Display name, defaulting to the identifier when omitted.
    pub fn display_name(&self) -> &str {
        match self.chunk_name.as_ref().and_then(Option::as_deref) {
            Some(name) if !name.is_empty() => name,
            _ => &self.chunk,
        }
    }
}

/// Marks a key that is present in the source, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
