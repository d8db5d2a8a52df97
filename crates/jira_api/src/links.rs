//! Classification of an issue's relations to other issues.

use serde_json::Value;

use crate::models::IssueRecord;

pub const RELATION_SELF: &str = "Self";
pub const RELATION_PARENT: &str = "Parent";

/// One directed relation from an issue to another, labeled by how the target
/// is reached (`Parent`, `Inward: {type}` or `Outward: {type}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    pub key: String,
    pub relation: String,
}

/// Enumerates the related issues of a raw record. A parent reference comes
/// first; link entries follow in source order, and a single link record may
/// contribute both an inward and an outward entry.
pub fn links_of(record: &IssueRecord) -> Vec<IssueLink> {
    let fields = &record.fields;
    let mut links = Vec::new();

    if let Some(parent_key) = fields
        .get("parent")
        .and_then(|p| p.get("key"))
        .and_then(Value::as_str)
    {
        links.push(IssueLink {
            key: parent_key.to_string(),
            relation: RELATION_PARENT.to_string(),
        });
    }

    if let Some(issue_links) = fields.get("issuelinks").and_then(Value::as_array) {
        for link in issue_links {
            if let Some(key) = link
                .get("inwardIssue")
                .and_then(|i| i.get("key"))
                .and_then(Value::as_str)
            {
                links.push(IssueLink {
                    key: key.to_string(),
                    relation: format!("Inward: {}", link_type_name(link, "inward")),
                });
            }
            if let Some(key) = link
                .get("outwardIssue")
                .and_then(|i| i.get("key"))
                .and_then(Value::as_str)
            {
                links.push(IssueLink {
                    key: key.to_string(),
                    relation: format!("Outward: {}", link_type_name(link, "outward")),
                });
            }
        }
    }

    links
}

fn link_type_name<'a>(link: &'a Value, direction: &str) -> &'a str {
    link.get("type")
        .and_then(|t| t.get(direction))
        .and_then(Value::as_str)
        .unwrap_or("")
}
