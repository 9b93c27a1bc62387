//! Issue API Tests
//!
//! Drives the router end to end with `tower::ServiceExt::oneshot` over a `MemoryStore`
//! (and one SQLite pass), checking status codes, bodies and ranked output.
//!
//! ## Test Scopes
//! - **Types**: Draft validation and filter matching.
//! - **Endpoints**: Every route, success and failure paths.
//! - **Application**: Static file fallback and CORS headers from `app::build_app`.

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::issues::protocol::{IssueListResponse, SearchParams};
    use crate::issues::router;
    use crate::issues::types::{Issue, IssueDraft, IssueFilter, IssueId};
    use crate::storage::{IssueStore, MemoryStore, SqliteStore};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn memory_app() -> Router {
        router(Arc::new(MemoryStore::new()))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };
        (status, value)
    }

    async fn create(app: &Router, title: &str, due_date: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/issues",
            Some(json!({"title": title, "due_date": due_date})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    fn titles(body: &Value) -> Vec<String> {
        body["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["title"].as_str().unwrap().to_string())
            .collect()
    }

    // ============================================================
    // TYPES
    // ============================================================

    #[test]
    fn test_draft_requires_title() {
        let draft = IssueDraft {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());

        let draft = IssueDraft {
            title: "Real title".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_blank_status() {
        let draft = IssueDraft {
            title: "Title".to_string(),
            status: Some("".to_string()),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_filter_matching() {
        let issue = Issue::from_draft(
            IssueId::from("1"),
            IssueDraft {
                title: "Login Fails".to_string(),
                assignee: Some("ana".to_string()),
                ..Default::default()
            },
            String::new(),
        );

        assert!(IssueFilter::default().matches(&issue));
        assert!(IssueFilter::default().is_empty());
        assert!(
            IssueFilter {
                title: Some("login".to_string()),
                status: Some("open".to_string()),
                ..Default::default()
            }
            .matches(&issue)
        );
        assert!(
            !IssueFilter {
                assignee: Some("ben".to_string()),
                ..Default::default()
            }
            .matches(&issue)
        );
    }

    #[test]
    fn test_search_params_drop_empty_values() {
        let params = SearchParams {
            status: Some(String::new()),
            assignee: Some("ana".to_string()),
            ..Default::default()
        };
        let filter = params.filter();

        assert_eq!(filter.status, None);
        assert_eq!(filter.assignee.as_deref(), Some("ana"));
    }

    #[test]
    fn test_issue_json_shape() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "3",
            "title": "From JSON"
        }))
        .unwrap();

        assert_eq!(issue.id, IssueId::from("3"));
        assert_eq!(issue.status, "open");
        assert_eq!(issue.due_date, None);

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["id"], "3", "IssueId serializes as a plain string");
    }

    // ============================================================
    // ENDPOINTS
    // ============================================================

    #[tokio::test]
    async fn test_list_is_ranked_by_due_date() {
        let app = memory_app();
        create(&app, "March", "2024-03-01").await;
        create(&app, "No date", "").await;
        create(&app, "January", "2024-01-01").await;
        create(&app, "Garbage", "someday").await;

        let (status, body) = send(&app, "GET", "/issues", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["January", "March", "Garbage", "No date"]);
        assert_eq!(body["total_count"], 4);
        assert_eq!(body["count"], 4);
    }

    #[tokio::test]
    async fn test_list_paging() {
        let app = memory_app();
        for day in 1..=5 {
            create(&app, &format!("Day {}", day), &format!("2024-01-0{}", day)).await;
        }

        let (status, body) = send(&app, "GET", "/issues?limit=2&offset=1", None).await;
        assert_eq!(status, StatusCode::OK);

        let page: IssueListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.count, 2);
        assert_eq!(page.issues[0].title, "Day 2");
        assert_eq!(page.issues[1].title, "Day 3");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (status, body) = send(&memory_app(), "GET", "/issues", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["issues"], json!([]));
        assert_eq!(body["total_count"], 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let app = memory_app();
        let id = create(&app, "Find me", "2024-02-02").await;

        let (status, body) = send(&app, "GET", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Find me");
        assert_eq!(body["due_date"], "2024-02-02");

        let (status, body) = send(&app, "GET", "/issues/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Issue not found");
    }

    #[tokio::test]
    async fn test_search_filters_and_ranks() {
        let app = memory_app();
        for (title, assignee, due) in [
            ("Ana later", "ana", "2024-06-01"),
            ("Ben", "ben", "2024-01-01"),
            ("Ana undated", "ana", " "),
            ("Ana sooner", "ana", "2024-02-01"),
        ] {
            let (status, _) = send(
                &app,
                "POST",
                "/issues",
                Some(json!({"title": title, "assignee": assignee, "due_date": due})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, "GET", "/issues/search?assignee=ana", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Ana sooner", "Ana later", "Ana undated"]);

        let (_, body) = send(&app, "GET", "/issues/search?title=BEN", None).await;
        assert_eq!(titles(&body), vec!["Ben"]);
    }

    #[tokio::test]
    async fn test_create_validates_title() {
        let app = memory_app();

        let body = json!({"due_date": "2024-01-01"});
        let (status, body) = send(&app, "POST", "/issues", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required");

        let (_, body) = send(&app, "GET", "/issues", None).await;
        assert_eq!(body["total_count"], 0, "Nothing stored on a rejected create");
    }

    #[tokio::test]
    async fn test_create_returns_stored_issue() {
        let app = memory_app();
        let (status, body) = send(
            &app,
            "POST",
            "/issues",
            Some(json!({"title": "Broken build", "description": "CI red", "assignee": "ana"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Broken build");
        assert_eq!(body["status"], "open");
        assert_eq!(body["description"], "CI red");
        assert!(body["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_update() {
        let app = memory_app();
        let id = create(&app, "Old title", "").await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/issues/{}", id),
            Some(json!({"title": "New title", "status": "closed", "due_date": "2025-01-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "New title");
        assert_eq!(body["status"], "closed");
        assert_eq!(body["id"], id.as_str());

        let (status, _) = send(&app, "PUT", "/issues/777", Some(json!({"title": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/issues/{}", id);
        let (status, _) = send(&app, "PUT", &uri, Some(json!({"title": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_bad_request() {
        let app = memory_app();

        let (status, body) = send(&app, "POST", "/issues", Some(json!({"title": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "Expected a JSON error, got {:?}", body);

        let id = create(&app, "Keep me", "").await;
        let uri = format!("/issues/{}", id);
        let mistyped = json!({"title": "x", "due_date": 7});
        let (status, body) = send(&app, "PUT", &uri, Some(mistyped)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/issues")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_query_is_json_bad_request() {
        let app = memory_app();

        let (status, body) = send(&app, "GET", "/issues?limit=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "Expected a JSON error, got {:?}", body);

        let (status, body) = send(&app, "GET", "/issues/search?offset=many", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_delete() {
        let app = memory_app();
        let id = create(&app, "Short lived", "").await;

        let (status, body) = send(&app, "DELETE", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "DELETE", &format!("/issues/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let (status, body) = send(&memory_app(), "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "backend": "memory"}));
    }

    #[tokio::test]
    async fn test_same_handlers_over_sqlite() {
        let store: Arc<dyn IssueStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let app = router(store);
        create(&app, "Later", "2024-12-31T23:59:59Z").await;
        create(&app, "Blank", " ").await;
        create(&app, "Sooner", "2024-12-31 08:00").await;

        let (status, body) = send(&app, "GET", "/issues", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Sooner", "Later", "Blank"]);

        let (status, body) = send(&app, "GET", "/issues/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Later");
    }

    // ============================================================
    // APPLICATION
    // ============================================================

    #[tokio::test]
    async fn test_app_serves_static_fallback() {
        let dir = std::env::temp_dir().join(format!("issue-service-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>issues</h1>").unwrap();

        let app = build_app(Arc::new(MemoryStore::new()), &dir);

        let (status, body) = send(&app, "GET", "/index.html", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("<h1>issues</h1>".to_string()));

        let (status, _) = send(&app, "GET", "/issues", None).await;
        assert_eq!(status, StatusCode::OK, "API routes win over the static fallback");

        let (status, _) = send(&app, "GET", "/missing.css", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_app_allows_cross_origin() {
        let app = build_app(Arc::new(MemoryStore::new()), std::path::Path::new("does-not-exist"));

        let request = Request::builder()
            .uri("/issues")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
