use serde::Deserialize;

use crate::models::IssueRecord;

/// One page of results from the JQL search endpoint. The endpoint paginates
/// by token and does not reliably report a total, so callers must reason
/// about `is_last`/`next_page_token` instead of trusting `total`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
    #[serde(default)]
    pub is_last: Option<bool>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl SearchPage {
    /// Whether the response indicates more results exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some() || self.is_last == Some(false)
    }
}
