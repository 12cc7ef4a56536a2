//! Renderer error types.

/// Error during markdown rendering.
///
/// Rendering a document is all-or-nothing; callers are expected to skip the
/// affected document and continue with the rest of the build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Writing to the output buffer failed.
    #[error("output write error")]
    Fmt(#[from] std::fmt::Error),
}
