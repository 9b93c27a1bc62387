use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use super::protocol::{HealthResponse, IssueListResponse, ListParams, SearchParams};
use super::types::{Issue, IssueDraft, IssueId};
use crate::errors::ApiError;
use crate::ranking::rank;
use crate::storage::IssueStore;

pub async fn handle_list_issues(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<IssueListResponse>, ApiError> {
    let Query(params) = params?;
    let issues = store.list().await?;
    tracing::debug!("Listing {} issues from {}", issues.len(), store.backend());

    Ok(Json(IssueListResponse::page(
        rank(issues),
        params.limit,
        params.offset,
    )))
}

pub async fn handle_search_issues(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<IssueListResponse>, ApiError> {
    let Query(params) = params?;
    let filter = params.filter();
    if filter.is_empty() {
        tracing::debug!("Search without criteria, matching every issue");
    }
    let issues = store.find(&filter).await?;
    tracing::debug!("Filter {:?} matched {} issues", filter, issues.len());

    Ok(Json(IssueListResponse::page(
        rank(issues),
        params.limit,
        params.offset,
    )))
}

pub async fn handle_get_issue(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    Path(id): Path<String>,
) -> Result<Json<Issue>, ApiError> {
    let id = IssueId(id);
    match store.get(&id).await? {
        Some(issue) => Ok(Json(issue)),
        None => {
            tracing::debug!("Issue not found: {}", id);
            Err(ApiError::NotFound)
        }
    }
}

pub async fn handle_create_issue(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    payload: Result<Json<IssueDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Issue>), ApiError> {
    let Json(draft) = payload?;
    draft.validate()?;

    let issue = store.create(draft).await?;
    tracing::info!("Created issue {} in {}", issue.id, store.backend());
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn handle_update_issue(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    Path(id): Path<String>,
    payload: Result<Json<IssueDraft>, JsonRejection>,
) -> Result<Json<Issue>, ApiError> {
    let Json(draft) = payload?;
    draft.validate()?;

    let id = IssueId(id);
    match store.update(&id, draft).await? {
        Some(issue) => {
            tracing::info!("Updated issue {}", id);
            Ok(Json(issue))
        }
        None => Err(ApiError::NotFound),
    }
}

pub async fn handle_delete_issue(
    Extension(store): Extension<Arc<dyn IssueStore>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = IssueId(id);
    if store.delete(&id).await? {
        tracing::info!("Deleted issue {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn handle_health(
    Extension(store): Extension<Arc<dyn IssueStore>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: store.backend().to_string(),
    })
}
