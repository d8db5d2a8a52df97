//! Breadth-first traversal of an issue's link graph.

use std::collections::{HashSet, VecDeque};

use jira_api::links::{links_of, RELATION_SELF};
use jira_api::{description, fields, JiraClient};
use serde::Serialize;
use tracing::{debug, warn};

/// One issue reached during traversal, annotated with the relation through
/// which it was first reached from the origin.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub key: String,
    pub name: String,
    pub description: String,
    pub assignee_name: String,
    pub assignee_id: Option<String>,
    pub timespent: f64,
    pub research_project: String,
    pub link_type: String,
}

/// Walks the link graph breadth-first from `origin_key`, visiting each issue
/// at most once. Fetch failures skip the node (its links are not followed)
/// and the traversal continues; the relation label recorded for an issue is
/// the one attached when it was first dequeued.
pub async fn issue_hierarchy(
    client: &JiraClient,
    research_project_field: &str,
    origin_key: &str,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    queue.push_back((origin_key.to_string(), RELATION_SELF.to_string()));

    while let Some((key, link_type)) = queue.pop_front() {
        if !visited.insert(key.clone()) {
            continue;
        }

        debug!("Fetching issue -> {key}");
        let record = match client.get_issue(&key).await {
            Ok(record) => record,
            Err(err) => {
                warn!("Failed to fetch issue {key}: {err}");
                continue;
            }
        };

        for link in links_of(&record) {
            queue.push_back((link.key, link.relation));
        }

        let assignee = fields::assignee_of(&record.fields);
        issues.push(Issue {
            name: fields::summary_of(&record.fields),
            description: description::plain_text_of(
                record.fields.get("description").unwrap_or(&serde_json::Value::Null),
            ),
            assignee_name: assignee.display_name,
            assignee_id: assignee.account_id,
            timespent: fields::own_hours_of(&record.fields),
            research_project: fields::option_value_of(&record.fields, research_project_field),
            link_type,
            key,
        });
    }

    debug!("Completed issue hierarchy retrieval ({} issues)", issues.len());
    issues
}

#[cfg(test)]
mod tests {
    use super::issue_hierarchy;
    use jira_api::{JiraClient, JiraConfig};
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> JiraClient {
        let config = JiraConfig::new("example.atlassian.net", "dev@example.com", "token")
            .with_base_url(server.url());
        JiraClient::new(config).expect("client should build")
    }

    fn issue_body(key: &str, links: serde_json::Value) -> String {
        json!({
            "key": key,
            "fields": {
                "summary": format!("Summary of {key}"),
                "assignee": {"displayName": "Dana", "accountId": "acc-1"},
                "issuelinks": links
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn cycle_is_traversed_once_per_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-A")
            .match_query(Matcher::Any)
            .with_body(issue_body(
                "PROJ-A",
                json!([{"type": {"outward": "blocks"}, "outwardIssue": {"key": "PROJ-B"}}]),
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-B")
            .match_query(Matcher::Any)
            .expect(1)
            .with_body(issue_body(
                "PROJ-B",
                json!([{"type": {"outward": "blocks"}, "outwardIssue": {"key": "PROJ-A"}}]),
            ))
            .create_async()
            .await;

        let client = client_for(&server);
        let issues = issue_hierarchy(&client, "customfield_10097", "PROJ-A").await;

        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-A", "PROJ-B"]);
        assert_eq!(issues[0].link_type, "Self");
        assert_eq!(issues[1].link_type, "Outward: blocks");
    }

    #[tokio::test]
    async fn failed_fetch_is_skipped_without_aborting() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-A")
            .match_query(Matcher::Any)
            .with_body(issue_body(
                "PROJ-A",
                json!([
                    {"type": {"outward": "blocks"}, "outwardIssue": {"key": "PROJ-GONE"}},
                    {"type": {"outward": "blocks"}, "outwardIssue": {"key": "PROJ-B"}}
                ]),
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-GONE")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-B")
            .match_query(Matcher::Any)
            .with_body(issue_body("PROJ-B", json!([])))
            .create_async()
            .await;

        let client = client_for(&server);
        let issues = issue_hierarchy(&client, "customfield_10097", "PROJ-A").await;

        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-A", "PROJ-B"]);
    }

    #[tokio::test]
    async fn breadth_first_order_and_first_dequeue_label_win() {
        let mut server = mockito::Server::new_async().await;
        // A links to B (parent) and C; both B and C link to D with different
        // labels. D must appear once, labeled via B's link (enqueued first).
        server
            .mock("GET", "/rest/api/3/issue/PROJ-A")
            .match_query(Matcher::Any)
            .with_body(
                json!({
                    "key": "PROJ-A",
                    "fields": {
                        "parent": {"key": "PROJ-B"},
                        "issuelinks": [
                            {"type": {"outward": "blocks"}, "outwardIssue": {"key": "PROJ-C"}}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-B")
            .match_query(Matcher::Any)
            .with_body(issue_body(
                "PROJ-B",
                json!([{"type": {"outward": "is parent of"}, "outwardIssue": {"key": "PROJ-D"}}]),
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-C")
            .match_query(Matcher::Any)
            .with_body(issue_body(
                "PROJ-C",
                json!([{"type": {"inward": "is blocked by"}, "inwardIssue": {"key": "PROJ-D"}}]),
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/3/issue/PROJ-D")
            .match_query(Matcher::Any)
            .expect(1)
            .with_body(issue_body("PROJ-D", json!([])))
            .create_async()
            .await;

        let client = client_for(&server);
        let issues = issue_hierarchy(&client, "customfield_10097", "PROJ-A").await;

        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-A", "PROJ-B", "PROJ-C", "PROJ-D"]);
        assert_eq!(issues[1].link_type, "Parent");
        assert_eq!(issues[3].link_type, "Outward: is parent of");
    }
}
