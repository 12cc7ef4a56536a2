//! Error types for Confluence integration.

use confsync_renderer::RenderError;

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Error while synchronizing a document.
///
/// Apart from [`SyncError::ParentPageNotFound`], which aborts the whole run,
/// these are per-document: the caller logs a warning and continues with the
/// remaining documents.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Configured parent page does not exist in the target space.
    #[error("parent page `{0}` not found")]
    ParentPageNotFound(String),

    /// Markdown rendering failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Confluence API call failed.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),

    /// Attachment file could not be read.
    #[error("attachment error: {0}")]
    Attachment(#[from] std::io::Error),
}
