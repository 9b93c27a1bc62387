use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::issues::types::{Issue, IssueDraft, IssueFilter, IssueId};

/// CRUD access to the issue record set.
///
/// Each method is a single pass-through to the underlying store. Ordering of the
/// returned collections is unspecified; callers rank them.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Short backend name used in logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Every issue in the store.
    async fn list(&self) -> StoreResult<Vec<Issue>>;

    /// `None` when no issue has this id.
    async fn get(&self, id: &IssueId) -> StoreResult<Option<Issue>>;

    /// Issues matching every criterion set in `filter`.
    async fn find(&self, filter: &IssueFilter) -> StoreResult<Vec<Issue>>;

    /// Persist a validated draft and return the stored issue with its new id.
    async fn create(&self, draft: IssueDraft) -> StoreResult<Issue>;

    /// Replace the editable fields of an issue. `None` when no issue has this id.
    async fn update(&self, id: &IssueId, draft: IssueDraft) -> StoreResult<Option<Issue>>;

    /// Remove an issue. `false` when no issue has this id.
    async fn delete(&self, id: &IssueId) -> StoreResult<bool>;
}
