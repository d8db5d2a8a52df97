use serde::Deserialize;

/// Worklog list for one issue as returned by the per-issue worklog endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<WorklogEntry>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogEntry {
    #[serde(default)]
    pub author: Option<WorklogAuthor>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub time_spent_seconds: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}
