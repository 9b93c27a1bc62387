//! Application assembly: picks the store named by the configuration and wraps the
//! issue routes with static file serving, CORS and request tracing.

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{BackendKind, ServiceConfig};
use crate::errors::{ConfigError, StoreError};
use crate::issues;
use crate::storage::{FirebaseStore, IssueStore, MemoryStore, SqliteStore};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Construct the store selected by `config.backend`.
pub fn build_store(config: &ServiceConfig) -> Result<Arc<dyn IssueStore>, StartupError> {
    let store: Arc<dyn IssueStore> = match config.backend {
        BackendKind::Sqlite => Arc::new(SqliteStore::open(&config.db_path)?),
        BackendKind::Firebase => {
            let firebase = config
                .firebase
                .as_ref()
                .ok_or(ConfigError::MissingFirebaseUrl)?;
            tracing::info!("Using Firebase database at {}", firebase.database_url);
            Arc::new(FirebaseStore::new(
                &firebase.database_url,
                firebase.api_key.clone(),
            ))
        }
        BackendKind::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

/// The full HTTP application: issue API, static files as fallback, permissive CORS and
/// per-request tracing.
pub fn build_app(store: Arc<dyn IssueStore>, static_dir: &Path) -> Router {
    issues::router(store)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
