//! Issue hierarchy handlers, with and without the worklog rollup.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{client_for, reply, require_session, AppState};
use crate::config::KNOWN_RESEARCH_PROJECTS;
use crate::service::{issue_hierarchy, recent_worklogs, Issue};
use jira_api::JiraClient;

#[derive(Debug, Deserialize)]
pub(crate) struct FetchIssueParams {
    #[serde(default)]
    issue_key: Option<String>,
    /// Result-set size carried over from the preceding search, echoed back
    /// so the caller can keep displaying it.
    #[serde(default)]
    total_issues: Option<String>,
}

async fn hierarchy_for(
    state: &AppState,
    params: &FetchIssueParams,
) -> Result<(JiraClient, Vec<Issue>), Response> {
    let session = require_session(state).map_err(IntoResponse::into_response)?;
    let issue_key = params
        .issue_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            reply(StatusCode::BAD_REQUEST, "issue_key parameter is required").into_response()
        })?;
    let client = client_for(state, &session).map_err(IntoResponse::into_response)?;

    debug!("Fetching issue: {issue_key}");
    let issues = issue_hierarchy(&client, &state.config.research_project_field, issue_key).await;
    if issues.is_empty() {
        return Err(reply(
            StatusCode::NOT_FOUND,
            "Issue not found or unauthorized access",
        )
        .into_response());
    }
    Ok((client, issues))
}

/// Returns an issue with its linked-issue hierarchy.
pub(crate) async fn fetch_issue(
    State(state): State<AppState>,
    Query(params): Query<FetchIssueParams>,
) -> Response {
    let (_, issues) = match hierarchy_for(&state, &params).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    let assignee_name = issues[0].assignee_name.clone();
    let task_time_spent = issues[0].timespent;
    Json(json!({
        "issues": issues,
        "total_issues": params.total_issues.as_deref().unwrap_or("1"),
        "assignee_name": assignee_name,
        "task_time_spent": task_time_spent,
    }))
    .into_response()
}

/// Returns the hierarchy enriched with the assignee's recent worklog rollup
/// and the rendered hours distribution.
pub(crate) async fn fetch_issue_details(
    State(state): State<AppState>,
    Query(params): Query<FetchIssueParams>,
) -> Response {
    let (client, issues) = match hierarchy_for(&state, &params).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    let origin = issues[0].clone();
    let report = recent_worklogs(
        &client,
        &state.config.research_project_field,
        origin.assignee_id.as_deref(),
        Utc::now(),
    )
    .await;

    let sorted_projects = report.sorted_projects();
    let pie_chart = state.chart.render(&sorted_projects);

    Json(json!({
        "issues": issues,
        "total_issues": params.total_issues.as_deref().unwrap_or("1"),
        "assignee_name": origin.assignee_name,
        "task_time_spent": origin.timespent,
        "worklog_issues": report.issues,
        "sorted_projects": sorted_projects,
        "projects_without_time": report.projects_without_time(&KNOWN_RESEARCH_PROJECTS),
        "pie_chart": pie_chart,
    }))
    .into_response()
}
