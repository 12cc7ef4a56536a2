//! Markdown to Confluence storage format conversion.
//!
//! [`ConfluenceRenderer`] converts one markdown document to Confluence XHTML
//! storage format in a single pass, collecting the local attachment
//! references it encounters along the way. The renderer is consumed by
//! [`ConfluenceRenderer::render`], so one instance can never accumulate
//! attachment state across documents.

mod error;
mod renderer;

pub use error::RenderError;
pub use renderer::{ConfluenceRenderer, RenderResult};
