//! Firebase Realtime Database backend.
//!
//! Issues live under the `issues` node of the database tree, keyed by the push keys
//! Firebase generates on `POST`. The REST API addresses a node by appending `.json`
//! to its path; an absent node reads as JSON `null`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::backend::IssueStore;
use crate::errors::{StoreError, StoreResult};
use crate::issues::types::{
    Issue, IssueDraft, IssueFilter, IssueId, default_status, now_rfc3339,
};

const ISSUES_NODE: &str = "issues";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_ATTEMPTS: usize = 3;

/// Characters Firebase forbids in keys. An id containing one cannot exist and must not
/// be spliced into a path.
const FORBIDDEN_KEY_CHARS: &[char] = &['.', '#', '$', '[', ']', '/'];

/// The stored shape of an issue: everything except the id, which is the node key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IssueDocument {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    created_at: String,
}

impl IssueDocument {
    fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status.clone(),
            assignee: issue.assignee.clone(),
            due_date: issue.due_date.clone(),
            created_at: issue.created_at.clone(),
        }
    }

    fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            assignee: self.assignee,
            due_date: self.due_date,
            created_at: self.created_at,
        }
    }
}

/// Body Firebase returns for a `POST`: the generated key.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

pub struct FirebaseStore {
    http_client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseStore {
    /// `database_url` is the Realtime Database root, e.g.
    /// `https://<project>-default-rtdb.firebaseio.com`. `auth` is sent as the `auth`
    /// query parameter when present.
    pub fn new(database_url: &str, auth: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: database_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, ISSUES_NODE)
    }

    /// The node URL for one issue. The key is pushed as a percent-encoded path segment, so
    /// `%`, `?` and spaces in an id reach Firebase literally.
    fn issue_url(&self, id: &IssueId) -> StoreResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(ISSUES_NODE)
            .push(&format!("{}.json", id.0));
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(auth) => request.query(&[("auth", auth)]),
            None => request,
        }
    }

    /// Send a request, retrying transport failures with exponential backoff and jitter.
    /// Non-success statuses are returned as `StoreError::Backend` without retrying.
    async fn send_with_retry<F>(&self, build: F) -> StoreResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut delay_ms = 150u64;
        let mut attempt = 1;

        loop {
            let response = self
                .authorize(build())
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(StoreError::Backend { status, body });
                }
                Err(e) if attempt >= RETRY_ATTEMPTS => return Err(StoreError::Http(e)),
                Err(e) => {
                    tracing::warn!("Firebase request failed (attempt {}): {}", attempt, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                    attempt += 1;
                }
            }
        }
    }

    /// Read the whole `issues` node. Entries that do not decode as issues are skipped.
    async fn read_tree(&self) -> StoreResult<Vec<Issue>> {
        let url = self.collection_url();
        let response = self
            .send_with_retry(|| self.http_client.get(&url))
            .await?;
        let tree: Option<serde_json::Map<String, serde_json::Value>> = response.json().await?;

        let mut issues: Vec<Issue> = tree
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| {
                match serde_json::from_value::<IssueDocument>(value) {
                    Ok(doc) => Some(doc.into_issue(IssueId(key))),
                    Err(e) => {
                        tracing::warn!("Skipping malformed issue {}: {}", key, e);
                        None
                    }
                }
            })
            .collect();
        // Push keys are chronological, so key order is creation order.
        issues.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(issues)
    }

    async fn read_one(&self, id: &IssueId) -> StoreResult<Option<Issue>> {
        if !is_valid_key(id) {
            return Ok(None);
        }
        let url = self.issue_url(id)?;
        let response = self
            .send_with_retry(|| self.http_client.get(url.clone()))
            .await?;
        let doc: Option<IssueDocument> = response.json().await?;
        Ok(doc.map(|doc| doc.into_issue(id.clone())))
    }
}

fn is_valid_key(id: &IssueId) -> bool {
    !id.0.is_empty() && !id.0.contains(FORBIDDEN_KEY_CHARS)
}

#[async_trait]
impl IssueStore for FirebaseStore {
    fn backend(&self) -> &'static str {
        "firebase"
    }

    async fn list(&self) -> StoreResult<Vec<Issue>> {
        self.read_tree().await
    }

    async fn get(&self, id: &IssueId) -> StoreResult<Option<Issue>> {
        self.read_one(id).await
    }

    async fn find(&self, filter: &IssueFilter) -> StoreResult<Vec<Issue>> {
        let issues = self.read_tree().await?;
        Ok(issues
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect())
    }

    async fn create(&self, draft: IssueDraft) -> StoreResult<Issue> {
        let pending = Issue::from_draft(IssueId(String::new()), draft, now_rfc3339());
        let doc = IssueDocument::from_issue(&pending);

        let url = self.collection_url();
        let response = self
            .send_with_retry(|| self.http_client.post(&url).json(&doc))
            .await?;
        let pushed: PushResponse = response.json().await?;
        tracing::debug!("Firebase assigned key {}", pushed.name);

        Ok(Issue {
            id: IssueId(pushed.name),
            ..pending
        })
    }

    async fn update(&self, id: &IssueId, draft: IssueDraft) -> StoreResult<Option<Issue>> {
        let Some(existing) = self.read_one(id).await? else {
            return Ok(None);
        };
        let updated = existing.with_draft(draft);
        let doc = IssueDocument::from_issue(&updated);

        let url = self.issue_url(id)?;
        self.send_with_retry(|| self.http_client.put(url.clone()).json(&doc))
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &IssueId) -> StoreResult<bool> {
        if self.read_one(id).await?.is_none() {
            return Ok(false);
        }
        let url = self.issue_url(id)?;
        self.send_with_retry(|| self.http_client.delete(url.clone()))
            .await?;
        Ok(true)
    }
}
