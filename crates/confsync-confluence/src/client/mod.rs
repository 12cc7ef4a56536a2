//! Confluence REST API client.
//!
//! Sync HTTP client for Confluence Server/Data Center REST API with bearer
//! token (personal access token) authentication.

mod attachments;
mod pages;

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::api::{ConfluenceApi, RemoteAttachment, RemotePage};
use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client for `base_url` authenticating with `token`.
    #[must_use]
    pub fn new(base_url: &str, token: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: format!("Bearer {token}"),
        }
    }

    pub(crate) fn agent(&self) -> &Agent {
        &self.agent
    }

    pub(crate) fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// Get the API base URL.
    pub(crate) fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Check the response status and deserialize the JSON body.
    pub(crate) fn read_json<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> Result<T, ConfluenceError> {
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}

impl ConfluenceApi for ConfluenceClient {
    fn lookup_page_id(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<String>, ConfluenceError> {
        Ok(self.find_page(space, title, &[])?.map(|page| page.id))
    }

    fn get_page_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<RemotePage>, ConfluenceError> {
        Ok(self
            .find_page(space, title, &["body.storage"])?
            .map(|page| {
                let body = page
                    .body
                    .and_then(|b| b.storage)
                    .map_or_else(String::new, |s| s.value);
                RemotePage { id: page.id, body }
            }))
    }

    fn create_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<String, ConfluenceError> {
        let page = Self::create_page(self, space, title, body, parent_id)?;
        Ok(page.id)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<(), ConfluenceError> {
        Self::update_page(self, page_id, title, body, parent_id)
    }

    fn list_attachments(&self, page_id: &str) -> Result<Vec<RemoteAttachment>, ConfluenceError> {
        Ok(self
            .get_attachments(page_id)?
            .into_iter()
            .map(|att| RemoteAttachment {
                filename: att.title,
                comment: att.metadata.and_then(|m| m.comment),
            })
            .collect())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        comment: &str,
    ) -> Result<(), ConfluenceError> {
        self.attach_file(page_id, path, comment)
    }
}
