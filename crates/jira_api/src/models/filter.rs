use serde::Deserialize;

/// Saved filter details; only the stored JQL matters to this backend.
#[derive(Debug, Deserialize, Clone)]
pub struct FilterDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub jql: Option<String>,
}
