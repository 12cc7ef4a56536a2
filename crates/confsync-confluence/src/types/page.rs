//! Confluence page types.
//!
//! Only fields confsync actually uses are modeled; serde ignores the rest of
//! the API response.

use serde::Deserialize;

/// Confluence page.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Page {
    /// Page ID.
    pub id: String,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Version information.
    #[serde(default)]
    pub version: Option<Version>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Version {
    /// Version number.
    pub number: u32,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Storage {
    /// XHTML content in Confluence storage format.
    pub value: String,
}

/// Response of `GET /content?spaceKey=...&title=...`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentResponse {
    /// Matching pages (Confluence titles are unique per space, so at most
    /// one entry is expected).
    pub results: Vec<Page>,
}
