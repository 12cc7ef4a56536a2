//! Attachment reconciliation.
//!
//! The wiki stores one `<reference>:<checksum>` comment per attachment.
//! Each build recomputes every referenced file's checksum and re-uploads
//! only on mismatch, so unchanged attachments cost one metadata listing and
//! one local streaming read.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::api::{ConfluenceApi, RemoteAttachment};
use crate::error::SyncError;
use crate::fingerprint;

use super::PageSynchronizer;

impl<A: ConfluenceApi> PageSynchronizer<'_, A> {
    /// Reconcile the attachments referenced by one document.
    ///
    /// References are processed in discovery order. Duplicate references are
    /// handled independently; after the first upload the stored checksum
    /// matches, so the duplicate resolves to "unchanged".
    pub(super) fn sync_attachments(
        &self,
        page_id: &str,
        source_dir: &Path,
        references: &[String],
    ) -> Result<(), SyncError> {
        let remote = self.api.list_attachments(page_id)?;
        let stored = stored_checksums(&remote);

        for reference in references {
            let path = source_dir.join(reference);
            let checksum = fingerprint::file_fingerprint(&path)?;

            if stored.get(reference.as_str()) == Some(&checksum) {
                debug!("unchanged attachment {}", reference);
                continue;
            }
            self.api
                .upload_attachment(page_id, &path, &format!("{reference}:{checksum}"))?;
            info!("uploaded attachment {}", reference);
        }
        Ok(())
    }
}

/// Parse `reference -> checksum` pairs out of attachment comments.
///
/// Comments split on the first `:`; anything not matching the two-part
/// format is unrecognized metadata and ignored.
fn stored_checksums(attachments: &[RemoteAttachment]) -> HashMap<&str, String> {
    attachments
        .iter()
        .filter_map(|att| att.comment.as_deref())
        .filter_map(|comment| comment.split_once(':'))
        .map(|(reference, checksum)| (reference, checksum.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use crate::sync::Document;
    use pretty_assertions::assert_eq;

    fn document_with_image(dir: &Path, image: &str) -> Document {
        Document {
            title: "Intro".to_owned(),
            markdown: format!("# Hello\n\n![diagram]({image})"),
            source_path: dir.join("intro.md"),
        }
    }

    #[test]
    fn stored_checksums_ignores_unrecognized_comments() {
        let attachments = vec![
            RemoteAttachment {
                filename: "diagram.png".to_owned(),
                comment: Some("diagram.png:A1B2".to_owned()),
            },
            RemoteAttachment {
                filename: "plain.png".to_owned(),
                comment: Some("uploaded by hand".to_owned()),
            },
            RemoteAttachment {
                filename: "none.png".to_owned(),
                comment: None,
            },
        ];
        let stored = stored_checksums(&attachments);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("diagram.png"), Some(&"A1B2".to_owned()));
    }

    #[test]
    fn stored_checksums_splits_on_first_separator() {
        let attachments = vec![RemoteAttachment {
            filename: "a.png".to_owned(),
            comment: Some("a.png:AB:CD".to_owned()),
        }];
        let stored = stored_checksums(&attachments);
        assert_eq!(stored.get("a.png"), Some(&"AB:CD".to_owned()));
    }

    #[test]
    fn new_attachment_is_uploaded_with_checksum_comment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("diagram.png"), b"image bytes").unwrap();

        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        sync.sync(&document_with_image(dir.path(), "diagram.png"))
            .unwrap();

        assert_eq!(api.calls().upload_attachment, 1);
        let checksum = fingerprint::file_fingerprint(&dir.path().join("diagram.png")).unwrap();
        let page_id = api.page_id("DOCS", "Intro").unwrap();
        let comments = api.attachment_comments(&page_id);
        assert_eq!(comments, vec![format!("diagram.png:{checksum}")]);
    }

    #[test]
    fn unchanged_attachment_is_not_reuploaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("diagram.png"), b"image bytes").unwrap();

        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        let document = document_with_image(dir.path(), "diagram.png");

        sync.sync(&document).unwrap();
        sync.sync(&document).unwrap();

        assert_eq!(api.calls().upload_attachment, 1);
    }

    #[test]
    fn changed_attachment_is_reuploaded_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("diagram.png");
        std::fs::write(&image, b"image bytes").unwrap();

        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        let document = document_with_image(dir.path(), "diagram.png");

        sync.sync(&document).unwrap();
        std::fs::write(&image, b"image bytez").unwrap();
        sync.sync(&document).unwrap();

        assert_eq!(api.calls().upload_attachment, 2);
        let checksum = fingerprint::file_fingerprint(&image).unwrap();
        let page_id = api.page_id("DOCS", "Intro").unwrap();
        assert_eq!(
            api.attachment_comments(&page_id),
            vec![format!("diagram.png:{checksum}")]
        );
    }

    #[test]
    fn matching_stored_checksum_from_a_previous_build_skips_upload() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("diagram.png");
        std::fs::write(&image, b"image bytes").unwrap();
        let checksum = fingerprint::file_fingerprint(&image).unwrap();

        let api = MockApi::new().with_page("DOCS", "Intro", "<p>stale body</p>");
        let page_id = api.page_id("DOCS", "Intro").unwrap();
        let api = api.with_attachment(
            page_id.as_str(),
            "diagram.png",
            Some(&format!("diagram.png:{checksum}")),
        );

        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        sync.sync(&document_with_image(dir.path(), "diagram.png"))
            .unwrap();

        // Page body changed (no marker), but the attachment had not.
        assert_eq!(api.calls().update_page, 1);
        assert_eq!(api.calls().upload_attachment, 0);
    }

    #[test]
    fn references_resolve_relative_to_the_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/diagram.png"), b"image bytes").unwrap();

        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        sync.sync(&document_with_image(dir.path(), "img/diagram.png"))
            .unwrap();

        assert_eq!(api.calls().upload_attachment, 1);
    }

    #[test]
    fn missing_attachment_file_fails_that_document() {
        let dir = tempfile::tempdir().unwrap();
        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();

        let err = sync
            .sync(&document_with_image(dir.path(), "missing.png"))
            .unwrap_err();
        assert!(matches!(err, SyncError::Attachment(_)));
    }

    #[test]
    fn page_without_attachments_never_lists_them() {
        let api = MockApi::new();
        let sync = PageSynchronizer::new(&api, "DOCS", None).unwrap();
        sync.sync(&Document {
            title: "Intro".to_owned(),
            markdown: "# Hello".to_owned(),
            source_path: std::path::PathBuf::from("/docs/intro.md"),
        })
        .unwrap();

        assert_eq!(api.calls().list_attachments, 0);
        assert_eq!(api.calls().upload_attachment, 0);
    }
}
