//! Mock Confluence implementation for testing.
//!
//! Provides [`MockApi`] for unit testing the synchronizer without network
//! access. Pages and attachments live in memory; every API call is counted
//! so tests can assert on exactly which operations ran.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::{ConfluenceApi, RemoteAttachment, RemotePage};
use crate::error::ConfluenceError;

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `lookup_page_id` calls.
    pub lookup_page_id: usize,
    /// `get_page_by_title` calls.
    pub get_page_by_title: usize,
    /// `create_page` calls.
    pub create_page: usize,
    /// `update_page` calls.
    pub update_page: usize,
    /// `list_attachments` calls.
    pub list_attachments: usize,
    /// `upload_attachment` calls.
    pub upload_attachment: usize,
}

#[derive(Debug, Clone)]
struct StoredPage {
    id: String,
    body: String,
    parent_id: Option<String>,
}

/// Mock Confluence backend for testing.
///
/// Use the builder methods to seed remote state, run the synchronizer, then
/// inspect stored pages, attachment comments and call counts.
///
/// # Example
///
/// ```
/// use confsync_confluence::{ConfluenceApi, MockApi};
///
/// let api = MockApi::new().with_page("DOCS", "Home", "<p>home</p>");
/// let id = api.lookup_page_id("DOCS", "Home").unwrap();
/// assert!(id.is_some());
/// ```
#[derive(Debug, Default)]
pub struct MockApi {
    pages: RwLock<HashMap<(String, String), StoredPage>>,
    attachments: RwLock<HashMap<String, Vec<RemoteAttachment>>>,
    calls: RwLock<CallCounts>,
    next_id: AtomicU64,
}

impl MockApi {
    /// Create a new empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a remote page with the given stored body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        space: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let id = self.allocate_id();
        self.pages.write().unwrap().insert(
            (space.into(), title.into()),
            StoredPage {
                id,
                body: body.into(),
                parent_id: None,
            },
        );
        self
    }

    /// Seed an attachment record on a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_attachment(
        self,
        page_id: impl Into<String>,
        filename: impl Into<String>,
        comment: Option<&str>,
    ) -> Self {
        self.attachments
            .write()
            .unwrap()
            .entry(page_id.into())
            .or_default()
            .push(RemoteAttachment {
                filename: filename.into(),
                comment: comment.map(str::to_owned),
            });
        self
    }

    /// Stored body of a page, if it exists.
    pub fn page_body(&self, space: &str, title: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(&(space.to_owned(), title.to_owned()))
            .map(|page| page.body.clone())
    }

    /// Id of a page, if it exists.
    pub fn page_id(&self, space: &str, title: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(&(space.to_owned(), title.to_owned()))
            .map(|page| page.id.clone())
    }

    /// Parent id recorded for a page.
    pub fn parent_of(&self, page_id: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .values()
            .find(|page| page.id == page_id)
            .and_then(|page| page.parent_id.clone())
    }

    /// Comments of all attachments on a page, in upload order.
    pub fn attachment_comments(&self, page_id: &str) -> Vec<String> {
        self.attachments
            .read()
            .unwrap()
            .get(page_id)
            .map(|atts| {
                atts.iter()
                    .filter_map(|att| att.comment.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        *self.calls.read().unwrap()
    }

    fn allocate_id(&self) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{id}")
    }

    fn count(&self, bump: impl FnOnce(&mut CallCounts)) {
        bump(&mut self.calls.write().unwrap());
    }
}

impl ConfluenceApi for MockApi {
    fn lookup_page_id(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<String>, ConfluenceError> {
        self.count(|c| c.lookup_page_id += 1);
        Ok(self.page_id(space, title))
    }

    fn get_page_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<RemotePage>, ConfluenceError> {
        self.count(|c| c.get_page_by_title += 1);
        Ok(self
            .pages
            .read()
            .unwrap()
            .get(&(space.to_owned(), title.to_owned()))
            .map(|page| RemotePage {
                id: page.id.clone(),
                body: page.body.clone(),
            }))
    }

    fn create_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<String, ConfluenceError> {
        self.count(|c| c.create_page += 1);
        let id = self.allocate_id();
        self.pages.write().unwrap().insert(
            (space.to_owned(), title.to_owned()),
            StoredPage {
                id: id.clone(),
                body: body.to_owned(),
                parent_id: parent_id.map(str::to_owned),
            },
        );
        Ok(id)
    }

    fn update_page(
        &self,
        page_id: &str,
        _title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<(), ConfluenceError> {
        self.count(|c| c.update_page += 1);
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .values_mut()
            .find(|page| page.id == page_id)
            .ok_or_else(|| ConfluenceError::HttpResponse {
                status: 404,
                body: format!("no page with id {page_id}"),
            })?;
        page.body = body.to_owned();
        page.parent_id = parent_id.map(str::to_owned);
        Ok(())
    }

    fn list_attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ConfluenceError> {
        self.count(|c| c.list_attachments += 1);
        Ok(self
            .attachments
            .read()
            .unwrap()
            .get(page_id)
            .cloned()
            .unwrap_or_default())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        comment: &str,
    ) -> Result<(), ConfluenceError> {
        self.count(|c| c.upload_attachment += 1);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut attachments = self.attachments.write().unwrap();
        let records = attachments.entry(page_id.to_owned()).or_default();
        // Upsert by filename, like the real API.
        if let Some(existing) = records.iter_mut().find(|att| att.filename == filename) {
            existing.comment = Some(comment.to_owned());
        } else {
            records.push(RemoteAttachment {
                filename,
                comment: Some(comment.to_owned()),
            });
        }
        Ok(())
    }
}
