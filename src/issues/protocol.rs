//! Issue API Protocol
//!
//! Endpoint paths and the Data Transfer Objects (DTOs) exchanged with clients.

use serde::{Deserialize, Serialize};

use super::types::{Issue, IssueFilter};

// --- API Endpoints ---

/// Collection endpoint: list (GET) and create (POST).
pub const ENDPOINT_ISSUES: &str = "/issues";
/// Get-by-filter endpoint.
pub const ENDPOINT_SEARCH: &str = "/issues/search";
/// Single-issue endpoint: get, update and delete.
pub const ENDPOINT_ISSUE: &str = "/issues/:id";
/// Liveness check.
pub const ENDPOINT_HEALTH: &str = "/health";

pub const DEFAULT_LIMIT: usize = 100;

// --- Data Transfer Objects ---

/// Paging for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Query string of the get-by-filter endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub title: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SearchParams {
    /// Empty query values are treated as "not given".
    pub fn filter(&self) -> IssueFilter {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        IssueFilter {
            status: non_empty(&self.status),
            assignee: non_empty(&self.assignee),
            title: non_empty(&self.title),
        }
    }
}

/// Ranked, paged listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueListResponse {
    /// Number of matching issues before paging.
    pub total_count: usize,
    /// Number of issues in this page.
    pub count: usize,
    pub issues: Vec<Issue>,
}

impl IssueListResponse {
    pub fn page(ranked: Vec<Issue>, limit: Option<usize>, offset: Option<usize>) -> Self {
        let total_count = ranked.len();
        let issues: Vec<Issue> = ranked
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(DEFAULT_LIMIT))
            .collect();

        Self {
            total_count,
            count: issues.len(),
            issues,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}
