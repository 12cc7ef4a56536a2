//! Confluence integration for confsync.
//!
//! The heart of this crate is [`PageSynchronizer`], which reconciles one
//! local markdown document at a time against a Confluence space: render,
//! fingerprint, compare against the fingerprint embedded in the published
//! page, and create or update only when content actually changed. Attachment
//! reconciliation follows the same change-detection approach with per-file
//! checksums carried in the attachment comment field.
//!
//! All remote operations go through the [`ConfluenceApi`] trait;
//! [`ConfluenceClient`] is the HTTP implementation and [`MockApi`] the
//! in-memory one used in tests.

mod api;
mod client;
mod error;
pub mod fingerprint;
pub mod marker;
pub mod mock;
mod sync;
mod types;

pub use api::{ConfluenceApi, RemoteAttachment, RemotePage};
pub use client::ConfluenceClient;
pub use error::{ConfluenceError, SyncError};
pub use mock::MockApi;
pub use sync::{Document, PageSynchronizer, SyncOutcome};
