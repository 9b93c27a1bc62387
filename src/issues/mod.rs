//! Issue API Module
//!
//! The REST surface over the issue record set: list, get-by-id, get-by-filter, create,
//! update and delete. Handlers are written once against `Arc<dyn IssueStore>`; the
//! backend is chosen at startup and injected through an `Extension` layer.
//!
//! Listing and filter responses are always passed through `ranking::rank`.
//!
//! ## Submodules
//! - **`handlers`**: Axum request handlers.
//! - **`protocol`**: Endpoint paths and request/response DTOs.
//! - **`types`**: The `Issue` record, create/update drafts and filters.

pub mod handlers;
pub mod protocol;
pub mod types;

use axum::routing::get;
use axum::{Extension, Router};
use std::sync::Arc;

use crate::storage::IssueStore;
use handlers::*;
use protocol::{ENDPOINT_HEALTH, ENDPOINT_ISSUE, ENDPOINT_ISSUES, ENDPOINT_SEARCH};

/// Routes for the issue API, bound to `store`.
pub fn router(store: Arc<dyn IssueStore>) -> Router {
    Router::new()
        .route(ENDPOINT_HEALTH, get(handle_health))
        .route(
            ENDPOINT_ISSUES,
            get(handle_list_issues).post(handle_create_issue),
        )
        .route(ENDPOINT_SEARCH, get(handle_search_issues))
        .route(
            ENDPOINT_ISSUE,
            get(handle_get_issue)
                .put(handle_update_issue)
                .delete(handle_delete_issue),
        )
        .layer(Extension(store))
}

#[cfg(test)]
mod tests;
