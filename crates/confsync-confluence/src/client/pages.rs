//! Page operations for the Confluence API.

use serde_json::json;
use tracing::{debug, info};

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{ContentResponse, Page};

impl ConfluenceClient {
    /// Find a page by title in a space, with optional field expansion.
    pub(crate) fn find_page(
        &self,
        space: &str,
        title: &str,
        expand: &[&str],
    ) -> Result<Option<Page>, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        debug!("Looking up page '{}' in space {}", title, space);

        let mut request = self
            .agent()
            .get(&url)
            .query("spaceKey", space)
            .query("title", title);
        if !expand.is_empty() {
            request = request.query("expand", &expand.join(","));
        }

        let response = request
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let content: ContentResponse = Self::read_json(response)?;
        Ok(content.results.into_iter().next())
    }

    /// Create a new page and return it.
    pub(crate) fn create_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": space},
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });
        if let Some(parent) = parent_id {
            payload["ancestors"] = json!([{"id": parent}]);
        }

        info!("Creating page '{}' in space {}", title, space);

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .agent()
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        Self::read_json(response)
    }

    /// Overwrite an existing page (auto-increments the stored version).
    pub(crate) fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<(), ConfluenceError> {
        let version = self.page_version(page_id)?;
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let mut payload = json!({
            "type": "page",
            "title": title,
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            },
            "version": {"number": version + 1}
        });
        if let Some(parent) = parent_id {
            payload["ancestors"] = json!([{"id": parent}]);
        }

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .agent()
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let _: Page = Self::read_json(response)?;
        Ok(())
    }

    /// Fetch the current version number of a page.
    fn page_version(&self, page_id: &str) -> Result<u32, ConfluenceError> {
        let url = format!("{}/content/{}?expand=version", self.api_url(), page_id);

        let response = self
            .agent()
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let page: Page = Self::read_json(response)?;
        Ok(page.version.map_or(1, |v| v.number))
    }
}
