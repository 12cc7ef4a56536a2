//! Attachment operations for the Confluence API.

use std::path::Path;

use rand::RngExt;
use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// List attachments on a page, with the comment metadata expanded.
    pub(crate) fn get_attachments(
        &self,
        page_id: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError> {
        let url = format!(
            "{}/content/{}/child/attachment?expand=metadata&limit=1000",
            self.api_url(),
            page_id
        );

        info!("Getting attachments for page {}", page_id);

        let response = self
            .agent()
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let attachments: AttachmentsResponse = Self::read_json(response)?;
        Ok(attachments.results)
    }

    /// Upload or replace an attachment (upsert by filename).
    ///
    /// The comment is stored alongside the attachment and carries the
    /// `<reference>:<checksum>` convention used for change detection.
    pub(crate) fn attach_file(
        &self,
        page_id: &str,
        path: &Path,
        comment: &str,
    ) -> Result<(), ConfluenceError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = std::fs::read(path)?;

        // Existing attachments are updated through their own data endpoint
        let existing = self.find_attachment_by_name(page_id, &filename)?;
        let url = if let Some(ref att) = existing {
            info!(
                "Updating existing attachment '{}' (id={})",
                filename, att.id
            );
            format!(
                "{}/content/{}/child/attachment/{}/data",
                self.api_url(),
                page_id,
                att.id
            )
        } else {
            info!(
                "Uploading new attachment '{}' to page {}",
                filename, page_id
            );
            format!("{}/content/{}/child/attachment", self.api_url(), page_id)
        };

        let boundary = format!("----ConfsyncFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_body(&boundary, &filename, &data, comment);

        let response = self
            .agent()
            .post(&url)
            .header("Authorization", self.auth_header())
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        let _: serde_json::Value = Self::read_json(response)?;
        Ok(())
    }

    /// Find attachment by filename on a page.
    fn find_attachment_by_name(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        let attachments = self.get_attachments(page_id)?;
        Ok(attachments.into_iter().find(|a| a.title == filename))
    }
}

/// Build a multipart/form-data body with a file part and a comment part.
fn multipart_body(boundary: &str, filename: &str, data: &[u8], comment: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"comment\"\r\n\r\n");
    body.extend_from_slice(comment.as_bytes());
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_contains_file_and_comment_parts() {
        let body = multipart_body("----B", "diagram.png", b"bytes", "diagram.png:A1B2");
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains(r#"filename="diagram.png""#));
        assert!(text.contains("name=\"comment\"\r\n\r\ndiagram.png:A1B2"));
        assert!(text.ends_with("------B--\r\n"));
    }
}
