//! HTTP client for the Asana REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Record, TaskSource};
use crate::error::{Result, TapError};

const ASANA_API_URL: &str = "https://app.asana.com/api/1.0";

/// Page size for collection endpoints.
const PAGE_LIMIT: u32 = 100;

/// Authenticated Asana client. Every call is a blocking step in the
/// extraction sequence; there is no retry, backoff or rate-limit handling.
pub struct AsanaClient {
    client: Client,
    base_url: String,
    access_token: String,
}

/// One page of a collection response.
#[derive(Debug, Deserialize)]
struct Page {
    data: Vec<Record>,
    #[serde(default)]
    next_page: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    offset: String,
}

/// Single-resource responses wrap the payload in a `data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Record,
}

impl AsanaClient {
    /// Create a client authenticated with a personal access token.
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, ASANA_API_URL)
    }

    /// Create a client against a non-default API root.
    pub fn with_base_url(access_token: String, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// Execute one authenticated GET and deserialize the response body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TapError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            TapError::InvalidJson(format!("response from GET {}: {}", path, e))
        })
    }

    /// Fetch every page of a collection endpoint, following the opaque
    /// `next_page.offset` token, and return the concatenated records.
    async fn get_collection(&self, path: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query = vec![("limit".to_string(), PAGE_LIMIT.to_string())];
            if let Some(token) = &offset {
                query.push(("offset".to_string(), token.clone()));
            }

            let page: Page = self.get_json(path, &query).await?;
            records.extend(page.data);

            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl TaskSource for AsanaClient {
    async fn tasks_for_project(&self, project: &str) -> Result<Vec<Record>> {
        self.get_collection(&format!("/projects/{}/tasks", project))
            .await
    }

    async fn task_by_id(&self, task_id: &str) -> Result<Record> {
        let envelope: Envelope = self.get_json(&format!("/tasks/{}", task_id), &[]).await?;
        Ok(envelope.data)
    }

    async fn stories_for_task(&self, task_id: &str) -> Result<Vec<Record>> {
        self.get_collection(&format!("/tasks/{}/stories", task_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_next_offset() {
        let page: Page = serde_json::from_str(
            r#"{"data": [{"id": 1}], "next_page": {"offset": "abc", "path": "/x", "uri": "https://x"}}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.next_page.unwrap().offset, "abc");
    }

    #[test]
    fn test_page_without_next_is_last() {
        let page: Page = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_envelope_unwraps_data() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"data": {"id": 7, "name": "Task"}}"#).unwrap();
        assert_eq!(envelope.data.get("name").unwrap(), "Task");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AsanaClient::with_base_url("tok".to_string(), "https://example.test/api/");
        assert_eq!(client.base_url, "https://example.test/api");
    }
}
