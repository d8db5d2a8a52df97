//! Login, logout and session-status handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{reply, AppState};
use crate::session::Session;

#[derive(Debug, Deserialize, Default)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    api_token: Option<String>,
    #[serde(default)]
    jira_instance: Option<String>,
}

/// Stores the caller's Jira credentials as the active session.
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = body.email.unwrap_or_default();
    let api_token = body.api_token.unwrap_or_default();
    if email.is_empty() || api_token.is_empty() {
        return reply(
            StatusCode::BAD_REQUEST,
            "Email and API token are required",
        )
        .into_response();
    }

    let instance = body
        .jira_instance
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.config.jira_instance.clone());
    // A re-login keeps the filter the user was working through.
    let filter_id = state
        .sessions
        .current()
        .and_then(|session| session.filter_id);
    state.sessions.login(Session {
        email,
        api_token,
        instance: instance.clone(),
        filter_id,
    });
    debug!("Session established for instance {instance}");

    (
        StatusCode::OK,
        Json(json!({"message": "Login successful", "jira_instance": instance})),
    )
        .into_response()
}

/// Drops the active session.
pub(crate) async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    state.sessions.clear();
    Json(json!({"message": "Logout successful"}))
}

/// Reports whether a session is active.
pub(crate) async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.sessions.current() {
        Some(session) => Json(json!({
            "authenticated": true,
            "jira_instance": session.instance
        })),
        None => Json(json!({"authenticated": false})),
    }
}
