//! Page synchronization.
//!
//! [`PageSynchronizer`] reconciles one local document at a time against the
//! target space. Per document the state machine is:
//!
//! - page absent → create
//! - page present, embedded fingerprint matches → skip (no mutating calls)
//! - page present, fingerprint differs or marker missing → update
//!
//! The fingerprint covers `(title, rendered body)` *without* the marker
//! line; the marker embedded into the published body carries that same
//! fingerprint, so a second run over unchanged sources always skips.

mod attachments;

use std::path::{Path, PathBuf};

use confsync_renderer::ConfluenceRenderer;
use tracing::{debug, info};

use crate::api::ConfluenceApi;
use crate::error::SyncError;
use crate::{fingerprint, marker};

/// One local document to publish.
#[derive(Debug, Clone)]
pub struct Document {
    /// Page title (non-empty).
    pub title: String,
    /// Raw markdown body.
    pub markdown: String,
    /// Absolute path of the source file; attachment references resolve
    /// relative to its parent directory.
    pub source_path: PathBuf,
}

/// What the synchronizer did for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No remote page existed; one was created.
    Created {
        /// Id of the new page.
        page_id: String,
    },
    /// The remote page existed with a different (or missing) fingerprint.
    Updated {
        /// Id of the updated page.
        page_id: String,
    },
    /// The remote fingerprint matched; nothing was written.
    Skipped {
        /// Id of the unchanged page.
        page_id: String,
    },
}

impl SyncOutcome {
    /// Id of the remote page this outcome refers to.
    #[must_use]
    pub fn page_id(&self) -> &str {
        match self {
            Self::Created { page_id } | Self::Updated { page_id } | Self::Skipped { page_id } => {
                page_id
            }
        }
    }
}

/// Synchronizes local documents into a Confluence space.
///
/// Construction resolves the optional parent page once; a configured parent
/// that does not exist is fatal for the whole run.
pub struct PageSynchronizer<'a, A: ConfluenceApi> {
    api: &'a A,
    space: String,
    parent_page_id: Option<String>,
}

impl<'a, A: ConfluenceApi> PageSynchronizer<'a, A> {
    /// Create a synchronizer for `space`, resolving `parent_page` if set.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ParentPageNotFound`] if `parent_page` is
    /// configured but absent from the space.
    pub fn new(
        api: &'a A,
        space: impl Into<String>,
        parent_page: Option<&str>,
    ) -> Result<Self, SyncError> {
        let space = space.into();
        let parent_page_id = match parent_page {
            Some(title) => Some(
                api.lookup_page_id(&space, title)?
                    .ok_or_else(|| SyncError::ParentPageNotFound(title.to_owned()))?,
            ),
            None => None,
        };
        debug!("synchronizer initialized for space {}", space);
        Ok(Self {
            api,
            space,
            parent_page_id,
        })
    }

    /// Synchronize one document: page first, then its attachments.
    ///
    /// # Errors
    ///
    /// Render, API and attachment-file errors abort this document only;
    /// callers are expected to continue with the next one.
    pub fn sync(&self, document: &Document) -> Result<SyncOutcome, SyncError> {
        // Fresh renderer per document so attachment state cannot leak
        // across pages.
        let rendered = ConfluenceRenderer::new().render(&document.markdown)?;
        let checksum = fingerprint::page_fingerprint(&document.title, &rendered.body);
        let published_body = marker::embed(&checksum, &rendered.body);

        let outcome = match self.api.get_page_by_title(&self.space, &document.title)? {
            Some(current) => {
                if marker::extract(&current.body) == Some(checksum.as_str()) {
                    debug!(
                        "not updating unchanged {} '{}'",
                        document.source_path.display(),
                        document.title
                    );
                    SyncOutcome::Skipped {
                        page_id: current.id,
                    }
                } else {
                    info!(
                        "updating page {} '{}'",
                        document.source_path.display(),
                        document.title
                    );
                    self.api.update_page(
                        &current.id,
                        &document.title,
                        &published_body,
                        self.parent_page_id.as_deref(),
                    )?;
                    SyncOutcome::Updated {
                        page_id: current.id,
                    }
                }
            }
            None => {
                let page_id = self.api.create_page(
                    &self.space,
                    &document.title,
                    &published_body,
                    self.parent_page_id.as_deref(),
                )?;
                info!(
                    "created new page [{}] {} '{}'",
                    page_id,
                    document.source_path.display(),
                    document.title
                );
                SyncOutcome::Created { page_id }
            }
        };

        if !rendered.attachments.is_empty() {
            self.sync_attachments(
                outcome.page_id(),
                source_dir(&document.source_path),
                &rendered.attachments,
            )?;
        }

        Ok(outcome)
    }
}

/// Directory the document's attachment references resolve against.
fn source_dir(source_path: &Path) -> &Path {
    source_path.parent().unwrap_or(Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use pretty_assertions::assert_eq;

    fn doc(title: &str, markdown: &str) -> Document {
        Document {
            title: title.to_owned(),
            markdown: markdown.to_owned(),
            source_path: PathBuf::from("/site/docs/intro.md"),
        }
    }

    #[test]
    fn new_page_is_created_with_marker() {
        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();

        let outcome = sync.sync(&doc("Intro", "# Hello")).unwrap();

        let SyncOutcome::Created { page_id } = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        let body = api.page_body("DOCS", "Intro").unwrap();
        assert!(body.starts_with("<ac:placeholder>"));
        assert!(body.contains("<h1>Hello</h1>"));
        assert_eq!(api.calls().create_page, 1);
        assert_eq!(api.calls().update_page, 0);
        assert_eq!(api.calls().upload_attachment, 0);
        assert_eq!(api.page_id("DOCS", "Intro").as_deref(), Some(&*page_id));
    }

    #[test]
    fn second_run_without_changes_is_skipped() {
        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        let document = doc("Intro", "# Hello\n\nBody text.");

        let first = sync.sync(&document).unwrap();
        assert!(matches!(first, SyncOutcome::Created { .. }));

        let second = sync.sync(&document).unwrap();
        assert!(matches!(second, SyncOutcome::Skipped { .. }));
        // Skip performs the lookup but no mutations.
        assert_eq!(api.calls().create_page, 1);
        assert_eq!(api.calls().update_page, 0);
    }

    #[test]
    fn changed_content_is_updated() {
        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();

        sync.sync(&doc("Intro", "# Hello")).unwrap();
        let outcome = sync.sync(&doc("Intro", "# Hello again")).unwrap();

        assert!(matches!(outcome, SyncOutcome::Updated { .. }));
        assert_eq!(api.calls().update_page, 1);

        // And the update propagated the new fingerprint.
        let third = sync.sync(&doc("Intro", "# Hello again")).unwrap();
        assert!(matches!(third, SyncOutcome::Skipped { .. }));
    }

    #[test]
    fn missing_marker_forces_update_even_when_content_matches() {
        let api = MockApi::new().with_page("DOCS", "Intro", "<h1>Hello</h1>");
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();

        // Remote body is byte-identical to what we would render, but it has
        // no marker, so the synchronizer must republish.
        let outcome = sync.sync(&doc("Intro", "# Hello")).unwrap();
        assert!(matches!(outcome, SyncOutcome::Updated { .. }));
        assert_eq!(api.calls().update_page, 1);
    }

    #[test]
    fn garbled_marker_forces_update() {
        let api = MockApi::new().with_page(
            "DOCS",
            "Intro",
            "<ac:placeholder>edited by hand [0x123</ac:placeholder>\n<h1>Hello</h1>",
        );
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();

        let outcome = sync.sync(&doc("Intro", "# Hello")).unwrap();
        assert!(matches!(outcome, SyncOutcome::Updated { .. }));
    }

    #[test]
    fn parent_page_is_resolved_once_and_applied() {
        let api = MockApi::new().with_page("DOCS", "Home", "<p>home</p>");
        let parent_id = api.page_id("DOCS", "Home").unwrap();
        let sync = PageSynchronizer::new(&api, "DOCS", Some("Home")).unwrap();

        sync.sync(&doc("Intro", "# Hello")).unwrap();
        let child_id = api.page_id("DOCS", "Intro").unwrap();
        assert_eq!(api.parent_of(&child_id), Some(parent_id));
    }

    #[test]
    fn missing_parent_page_is_fatal() {
        let api = MockApi::new();
        let Err(err) = PageSynchronizer::new(&api, "DOCS", Some("Home")) else {
            panic!("expected parent lookup to fail");
        };
        assert!(matches!(err, SyncError::ParentPageNotFound(title) if title == "Home"));
    }
}
