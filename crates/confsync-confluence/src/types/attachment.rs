//! Confluence attachment types.

use serde::Deserialize;

/// Confluence attachment.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment title/filename.
    pub title: String,
    /// Attachment metadata (holds the comment field).
    #[serde(default)]
    pub metadata: Option<AttachmentMetadata>,
}

/// Attachment metadata.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttachmentMetadata {
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Attachments API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttachmentsResponse {
    /// List of attachments.
    pub results: Vec<Attachment>,
}
