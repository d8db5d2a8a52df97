//! Issue field writes and best-effort watcher registration.

use jira_api::error::StatusCode;
use jira_api::{JiraClient, JiraError, Result};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Writes the research project (always) and chargeable status (only when a
/// non-empty value was supplied) to an issue. Omitting chargeable leaves the
/// tracker's existing value untouched. Jira signals success with 204; any
/// other status surfaces as an error carrying the raw response.
pub async fn apply_update(
    client: &JiraClient,
    research_project_field: &str,
    chargeable_field: &str,
    issue_key: &str,
    research_project: &str,
    chargeable: Option<&str>,
) -> Result<()> {
    let mut fields = Map::new();
    fields.insert(
        research_project_field.to_string(),
        json!({"value": research_project}),
    );
    if let Some(chargeable) = chargeable.filter(|value| !value.trim().is_empty()) {
        fields.insert(chargeable_field.to_string(), json!({"id": chargeable}));
    }

    client
        .update_issue_fields(issue_key, &Value::Object(fields))
        .await
}

/// Registers the acting user as a watcher of an issue. Best-effort: every
/// failure, including "already watching" (400), is logged and swallowed.
pub async fn watch_issue(client: &JiraClient, issue_key: &str) {
    let account_id = match client.get_myself().await {
        Ok(profile) => profile.account_id,
        Err(err) => {
            warn!("Failed to resolve own account for watcher add: {err}");
            return;
        }
    };
    let Some(account_id) = account_id else {
        warn!("Own profile carries no account id, skipping watcher add");
        return;
    };

    match client.add_watcher(issue_key, &account_id).await {
        Ok(()) => {}
        Err(JiraError::Http { status, .. }) if status == StatusCode::BAD_REQUEST => {
            debug!("Already watching {issue_key}");
        }
        Err(err) => warn!("Failed to add watcher on {issue_key}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_update, watch_issue};
    use jira_api::{JiraClient, JiraConfig, JiraError};
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> JiraClient {
        let config = JiraConfig::new("example.atlassian.net", "dev@example.com", "token")
            .with_base_url(server.url());
        JiraClient::new(config).expect("client should build")
    }

    #[tokio::test]
    async fn omitted_chargeable_is_absent_from_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/rest/api/3/issue/PROJ-1")
            .match_body(Matcher::Json(json!({
                "fields": {"customfield_10097": {"value": "INTENSE"}}
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        apply_update(
            &client,
            "customfield_10097",
            "customfield_10384",
            "PROJ-1",
            "INTENSE",
            None,
        )
        .await
        .expect("update should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_chargeable_is_treated_as_omitted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/rest/api/3/issue/PROJ-1")
            .match_body(Matcher::Json(json!({
                "fields": {"customfield_10097": {"value": "INTENSE"}}
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        apply_update(
            &client,
            "customfield_10097",
            "customfield_10384",
            "PROJ-1",
            "INTENSE",
            Some("  "),
        )
        .await
        .expect("update should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chargeable_write_includes_option_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/rest/api/3/issue/PROJ-1")
            .match_body(Matcher::Json(json!({
                "fields": {
                    "customfield_10097": {"value": "INTENSE"},
                    "customfield_10384": {"id": "10123"}
                }
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        apply_update(
            &client,
            "customfield_10097",
            "customfield_10384",
            "PROJ-1",
            "INTENSE",
            Some("10123"),
        )
        .await
        .expect("update should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_update_relays_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/rest/api/3/issue/PROJ-1")
            .with_status(400)
            .with_body(r#"{"errors":{"customfield_10097":"Option not valid"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = apply_update(
            &client,
            "customfield_10097",
            "customfield_10384",
            "PROJ-1",
            "INTENSE",
            None,
        )
        .await
        .unwrap_err();

        match err {
            JiraError::Http { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("Option not valid"));
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn already_watching_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/3/myself")
            .with_body(json!({"accountId": "acc-9"}).to_string())
            .create_async()
            .await;
        let watcher = server
            .mock("POST", "/rest/api/3/issue/PROJ-1/watchers")
            .match_body(Matcher::Exact("\"acc-9\"".to_string()))
            .with_status(400)
            .with_body("already watching")
            .create_async()
            .await;

        let client = client_for(&server);
        watch_issue(&client, "PROJ-1").await;
        watcher.assert_async().await;
    }

    #[tokio::test]
    async fn missing_account_id_skips_watcher_call() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/3/myself")
            .with_body(json!({"displayName": "Dana"}).to_string())
            .create_async()
            .await;
        let watcher = server
            .mock("POST", "/rest/api/3/issue/PROJ-1/watchers")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        watch_issue(&client, "PROJ-1").await;
        watcher.assert_async().await;
    }
}
