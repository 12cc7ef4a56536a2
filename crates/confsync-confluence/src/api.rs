//! The wiki-service collaborator seam.
//!
//! [`ConfluenceApi`] is exactly the capability set the synchronizer needs,
//! nothing more. [`crate::ConfluenceClient`] implements it over HTTP;
//! [`crate::MockApi`] implements it in memory for tests.

use std::path::Path;

use crate::error::ConfluenceError;

/// Remote page state as seen by the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// Opaque page identifier.
    pub id: String,
    /// Stored body in Confluence storage format, including any embedded
    /// fingerprint marker.
    pub body: String,
}

/// Remote attachment metadata as seen by the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttachment {
    /// Attachment filename.
    pub filename: String,
    /// Free-text comment; confsync stores `<reference>:<checksum>` here.
    pub comment: Option<String>,
}

/// Operations the synchronizer performs against a Confluence-like backend.
///
/// All operations are at-most-once per build; retries are the caller's
/// problem, and no implementation retries internally.
pub trait ConfluenceApi {
    /// Look up a page id by title, `None` if the page does not exist.
    fn lookup_page_id(&self, space: &str, title: &str)
    -> Result<Option<String>, ConfluenceError>;

    /// Fetch a page with its stored body, `None` if the page does not exist.
    fn get_page_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<RemotePage>, ConfluenceError>;

    /// Create a page and return its new id.
    fn create_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<String, ConfluenceError>;

    /// Overwrite an existing page's title and body.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<(), ConfluenceError>;

    /// List attachment metadata for a page.
    fn list_attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ConfluenceError>;

    /// Upload (create or replace) an attachment from a local file.
    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        comment: &str,
    ) -> Result<(), ConfluenceError>;
}
