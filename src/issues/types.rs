use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ApiError;
use crate::ranking::Dated;

pub const DEFAULT_STATUS: &str = "open";

/// Identifier of an issue within its backing store.
///
/// SQLite renders its integer rowid here; Firebase uses the push key it generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueId(pub String);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IssueId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored issue, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Kept verbatim, including blank sentinels. Ordering is decided by `ranking`.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Issue {
    pub fn from_draft(id: IssueId, draft: IssueDraft, created_at: String) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status.unwrap_or_else(default_status),
            assignee: draft.assignee,
            due_date: draft.due_date,
            created_at,
        }
    }

    /// Apply an update body, keeping `id` and `created_at`.
    pub fn with_draft(self, draft: IssueDraft) -> Self {
        Self::from_draft(self.id, draft, self.created_at)
    }
}

impl Dated for Issue {
    fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }
}

/// Create / update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IssueDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl IssueDraft {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("Title is required".to_string()));
        }
        if let Some(status) = &self.status
            && status.trim().is_empty()
        {
            return Err(ApiError::BadRequest("Status must not be blank".to_string()));
        }
        Ok(())
    }

    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }
}

/// Criteria for the get-by-filter endpoint. All present fields must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    /// Exact match.
    pub status: Option<String>,
    /// Exact match.
    pub assignee: Option<String>,
    /// Case-insensitive substring.
    pub title: Option<String>,
}

impl IssueFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assignee.is_none() && self.title.is_none()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(status) = &self.status
            && &issue.status != status
        {
            return false;
        }
        if let Some(assignee) = &self.assignee
            && issue.assignee.as_ref() != Some(assignee)
        {
            return false;
        }
        if let Some(title) = &self.title
            && !issue.title.to_lowercase().contains(&title.to_lowercase())
        {
            return false;
        }
        true
    }
}

pub fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

/// Server-side creation timestamp, RFC 3339 in UTC.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
