//! HTTP surface of the triage backend.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::chart::ChartRenderer;
use crate::config::AppConfig;
use crate::session::{Session, SessionStore};
use jira_api::{JiraClient, JiraConfig};

mod auth;
mod issues;
mod search;
mod update;

/// Shared application state threaded into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub chart: Arc<dyn ChartRenderer>,
}

/// Builds the full API router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/session", get(auth::session_status))
        .route("/api/fetch_issue", get(issues::fetch_issue))
        .route("/api/fetch_issue_details", get(issues::fetch_issue_details))
        .route("/api/search_issue", post(search::search_issue))
        .route("/api/update_issue", post(update::update_issue))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Plain message body used by error and status responses.
#[derive(Serialize)]
pub(crate) struct MessageBody {
    pub message: String,
}

pub(crate) type ErrorReply = (StatusCode, Json<MessageBody>);

pub(crate) fn reply(status: StatusCode, message: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
}

/// Returns the active session or a 401 reply. Checked before any outbound
/// call is attempted.
pub(crate) fn require_session(state: &AppState) -> Result<Session, ErrorReply> {
    state
        .sessions
        .current()
        .ok_or_else(|| reply(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

/// Builds a Jira client from the session's request-scoped credentials.
pub(crate) fn client_for(state: &AppState, session: &Session) -> Result<JiraClient, ErrorReply> {
    let mut config = JiraConfig::new(
        &session.instance,
        session.email.as_str(),
        session.api_token.as_str(),
    );
    if let Some(base_url) = &state.config.jira_base_url {
        config = config.with_base_url(base_url.clone());
    }
    JiraClient::new(config).map_err(|err| {
        error!("Failed to build Jira client: {err}");
        reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to initialize Jira client.",
        )
    })
}
