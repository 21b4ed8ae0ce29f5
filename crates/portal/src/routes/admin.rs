use axum::http::HeaderMap;
use axum::{
    extract::State,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use gazette_core::document::model::NewsletterDocument;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Admin editor routes. Every request re-presents the credential; there is
/// no server-side session.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/session", post(check_session))
        .route("/api/admin/newsletter", put(commit_newsletter))
}

#[derive(Debug, Deserialize)]
struct SessionRequest {
    password: String,
}

/// Credential check gating entry into the editor UI.
async fn check_session(
    State(state): State<AppState>,
    Json(body): Json<SessionRequest>,
) -> ApiResult<Json<Value>> {
    if auth::check_credential(&state.config().admin_password_hash, &body.password) {
        Ok(Json(json!({ "ok": true })))
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Commit a full edited document (the editor's saved draft).
///
/// The sync engine applies it locally no matter what; a remote write
/// failure comes back as an actionable `saveFailed` so the admin can retry.
async fn commit_newsletter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<NewsletterDocument>,
) -> ApiResult<Json<Value>> {
    require_admin(&state, &headers)?;
    state.engine().commit(doc).await?;
    Ok(Json(json!({ "ok": true })))
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if auth::check_credential(&state.config().admin_password_hash, provided) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
