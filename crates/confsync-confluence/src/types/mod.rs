//! Wire types for the Confluence REST API.

mod attachment;
mod page;

pub(crate) use attachment::{Attachment, AttachmentsResponse};
pub(crate) use page::{ContentResponse, Page};
