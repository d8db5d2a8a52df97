//! Issue update handler: write fields, register watcher, advance to the
//! next candidate in the saved filter.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::{client_for, reply, require_session, AppState};
use crate::audit;
use crate::service::{apply_update, next_issue_from_filter, watch_issue};
use jira_api::JiraError;

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRequest {
    #[serde(default)]
    issue_key: Option<String>,
    #[serde(default)]
    research_project: Option<String>,
    #[serde(default)]
    chargeable: Option<String>,
}

pub(crate) async fn update_issue(
    State(state): State<AppState>,
    Json(body): Json<UpdateRequest>,
) -> Response {
    let session = match require_session(&state) {
        Ok(session) => session,
        Err(rejection) => return rejection.into_response(),
    };

    let (issue_key, research_project) = match (&body.issue_key, &body.research_project) {
        (Some(key), Some(project)) if !key.is_empty() && !project.is_empty() => {
            (key.as_str(), project.as_str())
        }
        _ => return reply(StatusCode::BAD_REQUEST, "Missing required fields.").into_response(),
    };

    let client = match client_for(&state, &session) {
        Ok(client) => client,
        Err(rejection) => return rejection.into_response(),
    };

    debug!(
        "Updating issue {issue_key}: research project -> {research_project}, chargeable -> {:?}",
        body.chargeable
    );
    if let Err(err) = apply_update(
        &client,
        &state.config.research_project_field,
        &state.config.chargeable_field,
        issue_key,
        research_project,
        body.chargeable.as_deref(),
    )
    .await
    {
        error!("Failed to update issue {issue_key}: {err}");
        return match err {
            JiraError::Http { status, body } => (
                StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Json(json!({
                    "message": "Failed to update issue.",
                    "jira_response": body,
                    "status_code": status.as_u16(),
                })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Error updating issue.",
                    "error": other.to_string(),
                    "status_code": 500,
                })),
            )
                .into_response(),
        };
    }

    watch_issue(&client, issue_key).await;
    audit::record_update(&state.config.updated_issues_log, issue_key);

    // The search index may still return the issue just updated; exclude it
    // when advancing.
    let filter_id = session
        .filter_id
        .unwrap_or_else(|| state.config.default_filter_id.clone());
    let selection = next_issue_from_filter(&client, &filter_id, Some(issue_key)).await;

    match selection.issue_key {
        Some(next_issue) => Json(json!({
            "message": "Issue updated successfully.",
            "next_issue": next_issue,
            "total_issues": selection.total,
        }))
        .into_response(),
        None => Json(json!({
            "message": "Issue updated, but no more issues found.",
            "next_issue": null,
        }))
        .into_response(),
    }
}
