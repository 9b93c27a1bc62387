use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::backend::IssueStore;
use crate::errors::StoreResult;
use crate::issues::types::{Issue, IssueDraft, IssueFilter, IssueId, now_rfc3339};

/// In-process store. Ids are decimal counters starting at 1, like SQLite rowids.
pub struct MemoryStore {
    issues: DashMap<IssueId, Issue>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            issues: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert an issue as-is, keeping its id. Used to seed fixtures.
    pub fn store_local(&self, issue: Issue) {
        if let Ok(n) = issue.id.0.parse::<u64>() {
            self.next_id.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
        self.issues.insert(issue.id.clone(), issue);
    }

    fn snapshot(&self) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .issues
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; hand back insertion order like a table scan.
        issues.sort_by_key(|issue| issue.id.0.parse::<u64>().unwrap_or(u64::MAX));
        issues
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<Issue>> {
        Ok(self.snapshot())
    }

    async fn get(&self, id: &IssueId) -> StoreResult<Option<Issue>> {
        Ok(self.issues.get(id).map(|entry| entry.value().clone()))
    }

    async fn find(&self, filter: &IssueFilter) -> StoreResult<Vec<Issue>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect())
    }

    async fn create(&self, draft: IssueDraft) -> StoreResult<Issue> {
        let id = IssueId(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        let issue = Issue::from_draft(id.clone(), draft, now_rfc3339());
        self.issues.insert(id, issue.clone());
        tracing::debug!("Stored issue {} in memory", issue.id);
        Ok(issue)
    }

    async fn update(&self, id: &IssueId, draft: IssueDraft) -> StoreResult<Option<Issue>> {
        match self.issues.get_mut(id) {
            Some(mut entry) => {
                let updated = entry.value().clone().with_draft(draft);
                *entry.value_mut() = updated.clone();
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &IssueId) -> StoreResult<bool> {
        Ok(self.issues.remove(id).is_some())
    }
}
