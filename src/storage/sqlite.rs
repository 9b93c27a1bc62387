//! SQLite storage backend: the local relational file-store.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::backend::IssueStore;
use crate::errors::{StoreError, StoreResult};
use crate::issues::types::{Issue, IssueDraft, IssueFilter, IssueId, now_rfc3339};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS ISSUE (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'open',
        assignee TEXT,
        due_date TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_issue_status ON ISSUE(status);
    CREATE INDEX IF NOT EXISTS idx_issue_assignee ON ISSUE(assignee);
";

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, status, assignee, due_date, created_at FROM ISSUE";

/// SQLite-backed store. The connection is shared behind a mutex and only touched from
/// `spawn_blocking` so request tasks never block the runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating its parent directory and the schema
    /// when missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        tracing::info!("Connected to the issue database at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

/// Ids that are not decimal integers cannot exist in the table.
fn parse_rowid(id: &IssueId) -> Option<i64> {
    id.0.parse().ok()
}

fn row_to_issue(row: &Row<'_>) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: IssueId(row.get::<_, i64>("id")?.to_string()),
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        assignee: row.get("assignee")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
    })
}

fn select_one(conn: &Connection, id: i64) -> StoreResult<Option<Issue>> {
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_issue).optional()?)
}

#[async_trait]
impl IssueStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> StoreResult<Vec<Issue>> {
        self.with_conn(|conn| {
            let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let issues = stmt
                .query_map([], row_to_issue)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(issues)
        })
        .await
    }

    async fn get(&self, id: &IssueId) -> StoreResult<Option<Issue>> {
        let Some(rowid) = parse_rowid(id) else {
            return Ok(None);
        };
        self.with_conn(move |conn| select_one(conn, rowid)).await
    }

    async fn find(&self, filter: &IssueFilter) -> StoreResult<Vec<Issue>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut sql = format!("{} WHERE 1 = 1", SELECT_COLUMNS);
            let mut args: Vec<String> = Vec::new();
            if let Some(status) = &filter.status {
                sql.push_str(" AND status = ?");
                args.push(status.clone());
            }
            if let Some(assignee) = &filter.assignee {
                sql.push_str(" AND assignee = ?");
                args.push(assignee.clone());
            }
            sql.push_str(" ORDER BY id");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(args.iter()), row_to_issue)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            // SQLite's LIKE/lower() only fold ASCII; the title match runs here instead.
            Ok(rows
                .into_iter()
                .filter(|issue| filter.matches(issue))
                .collect())
        })
        .await
    }

    async fn create(&self, draft: IssueDraft) -> StoreResult<Issue> {
        let created_at = now_rfc3339();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO ISSUE (title, description, status, assignee, due_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    draft.title,
                    draft.description,
                    draft.status_or_default(),
                    draft.assignee,
                    draft.due_date,
                    created_at,
                ],
            )?;
            let id = IssueId(conn.last_insert_rowid().to_string());
            tracing::debug!("Inserted issue {}", id);
            Ok(Issue::from_draft(id, draft, created_at))
        })
        .await
    }

    async fn update(&self, id: &IssueId, draft: IssueDraft) -> StoreResult<Option<Issue>> {
        let Some(rowid) = parse_rowid(id) else {
            return Ok(None);
        };
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE ISSUE
                 SET title = ?1, description = ?2, status = ?3, assignee = ?4, due_date = ?5
                 WHERE id = ?6",
                params![
                    draft.title,
                    draft.description,
                    draft.status_or_default(),
                    draft.assignee,
                    draft.due_date,
                    rowid,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_one(conn, rowid)
        })
        .await
    }

    async fn delete(&self, id: &IssueId) -> StoreResult<bool> {
        let Some(rowid) = parse_rowid(id) else {
            return Ok(false);
        };
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM ISSUE WHERE id = ?1", params![rowid])?;
            Ok(changed > 0)
        })
        .await
    }
}
