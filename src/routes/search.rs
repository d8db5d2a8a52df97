//! Filter search handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{client_for, require_session, AppState};
use crate::service::{next_issue_from_filter, FilterTotal};

#[derive(Debug, Deserialize, Default)]
pub(crate) struct SearchRequest {
    #[serde(default)]
    filter_id: Option<String>,
}

/// Picks the next issue from a saved filter and remembers the filter for the
/// update flow.
pub(crate) async fn search_issue(
    State(state): State<AppState>,
    body: Option<Json<SearchRequest>>,
) -> Response {
    let session = match require_session(&state) {
        Ok(session) => session,
        Err(rejection) => return rejection.into_response(),
    };
    let client = match client_for(&state, &session) {
        Ok(client) => client,
        Err(rejection) => return rejection.into_response(),
    };

    let filter_id = body
        .and_then(|Json(body)| body.filter_id)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| state.config.default_filter_id.clone());
    state.sessions.set_filter_id(filter_id.as_str());

    let selection = next_issue_from_filter(&client, &filter_id, None).await;
    debug!("Total issues found: {}", selection.total);

    match selection.issue_key {
        Some(issue_key) => Json(json!({
            "issue_key": issue_key,
            "total_issues": selection.total,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "No issues found for the given filter.",
                "issue_key": null,
                "total_issues": FilterTotal::Exact(0),
            })),
        )
            .into_response(),
    }
}
