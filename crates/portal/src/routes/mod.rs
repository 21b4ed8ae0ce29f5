pub mod admin;
pub mod health;
pub mod newsletter;
pub mod widget;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(newsletter::routes())
        .merge(widget::routes())
        .merge(admin::routes())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use gazette_core::document::model::NewsletterDocument;
    use gazette_sync::engine::{SyncEngine, SyncEngineOptions};
    use gazette_sync::store::memory::{MemoryCache, MemoryRemoteStore};

    use crate::auth::hash_for_tests;
    use crate::config::PortalConfig;

    pub(crate) const TEST_PASSWORD: &str = "opensesame";

    pub(crate) fn test_config() -> PortalConfig {
        PortalConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            remote_url: "http://remote.invalid".to_string(),
            remote_api_key: "key".to_string(),
            remote_table: "newsletter".to_string(),
            document_id: "main".to_string(),
            cache_dir: String::new(),
            admin_password_hash: hash_for_tests(TEST_PASSWORD),
            poll_interval_secs: 5,
            widget_tick_secs: 60,
            log_level: "info".to_string(),
        }
    }

    /// A router over in-memory stores, plus the remote double for failure
    /// injection.
    pub(crate) fn test_router() -> (Router, Arc<MemoryRemoteStore>) {
        let remote = Arc::new(MemoryRemoteStore::new());
        let remote_for_engine = Arc::clone(&remote);
        let engine = SyncEngine::new(
            remote_for_engine,
            Arc::new(MemoryCache::new()),
            SyncEngineOptions {
                min_syncing_hold: std::time::Duration::ZERO,
                ..SyncEngineOptions::default()
            },
        );
        let state = AppState::new(engine, test_config());
        (build_router(state), remote)
    }

    pub(crate) async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_sync_state() {
        let (app, _remote) = test_router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sync"], "idle");
    }

    #[tokio::test]
    async fn newsletter_serves_the_current_document() {
        let (app, _remote) = test_router();
        let response = app
            .oneshot(Request::get("/api/newsletter").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["sections"].is_array());
        let doc: NewsletterDocument = serde_json::from_value(body).unwrap();
        assert_eq!(doc, NewsletterDocument::default());
    }

    #[tokio::test]
    async fn admin_session_check_accepts_the_credential() {
        let (app, _remote) = test_router();
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/admin/session")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "password": TEST_PASSWORD }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::post("/api/admin/session")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "password": "wrong" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn commit_requires_the_admin_credential() {
        let (app, _remote) = test_router();
        let doc = serde_json::to_string(&NewsletterDocument::default()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/admin/newsletter")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(doc))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn authorized_commit_writes_through_to_the_remote_row() {
        let (app, remote) = test_router();
        let mut doc = NewsletterDocument::default();
        doc.widget_enabled = true;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/admin/newsletter")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-admin-key", TEST_PASSWORD)
                    .body(Body::from(serde_json::to_string(&doc).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(remote.upsert_calls(), 1);
        assert_eq!(remote.row().unwrap()["widgetEnabled"], true);
    }

    #[tokio::test]
    async fn failed_remote_save_surfaces_but_keeps_local_state() {
        let (app, remote) = test_router();
        remote.fail_upserts(true);
        let mut doc = NewsletterDocument::default();
        doc.footer.connect_label = "FRESH".to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/admin/newsletter")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-admin-key", TEST_PASSWORD)
                    .body(Body::from(serde_json::to_string(&doc).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "saveFailed");

        // The admin's own view already shows the new content.
        let response = app
            .oneshot(Request::get("/api/newsletter").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["footer"]["connectLabel"], "FRESH");
    }
}
