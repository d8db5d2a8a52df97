//! Filter-driven sequential issue selection with best-effort counting.

use std::fmt;

use jira_api::JiraClient;
use serde::{Serialize, Serializer};
use tracing::{debug, error, warn};

/// Page cap for the recount request. Beyond this the total is reported as
/// open-ended rather than paging through the whole result set.
pub const COUNT_PAGE_CAP: u32 = 1000;
/// Candidate batch size when a key is being excluded in-process; large
/// enough that the batch survives removing one key.
pub const EXCLUSION_BATCH: u32 = 10;

/// Result-set size for a filter: either exactly `n` matches, or at least `n`
/// when more results exist beyond the recounted page. The two are never
/// collapsed into one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTotal {
    Exact(u64),
    AtLeast(u64),
}

impl fmt::Display for FilterTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTotal::Exact(n) => write!(f, "{n}"),
            FilterTotal::AtLeast(n) => write!(f, "{n}+"),
        }
    }
}

impl Serialize for FilterTotal {
    /// Serializes as the display form (`"42"` or `"1000+"`) so the open-ended
    /// tag survives the trip to the interface boundary.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one filter search: the next candidate (if any) and the total
/// estimate.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSelection {
    pub issue_key: Option<String>,
    pub total: FilterTotal,
}

impl FilterSelection {
    fn empty() -> Self {
        Self {
            issue_key: None,
            total: FilterTotal::Exact(0),
        }
    }
}

/// Resolves a saved filter and returns one candidate issue from its result
/// set, optionally skipping `exclude_key` (a just-updated issue the search
/// index may still be returning). The total is recounted with a second,
/// larger request because the paginated search endpoint reports no reliable
/// total of its own.
pub async fn next_issue_from_filter(
    client: &JiraClient,
    filter_id: &str,
    exclude_key: Option<&str>,
) -> FilterSelection {
    let jql = match client.get_filter(filter_id).await {
        Ok(filter) => match filter.jql {
            Some(jql) if !jql.trim().is_empty() => jql,
            _ => {
                error!("Saved filter {filter_id} carries no JQL");
                return FilterSelection::empty();
            }
        },
        Err(err) => {
            error!("Could not load saved filter {filter_id}: {err}");
            return FilterSelection::empty();
        }
    };

    let batch = if exclude_key.is_some() {
        EXCLUSION_BATCH
    } else {
        1
    };
    let page = match client.search_jql(&jql, batch, &["key"], None).await {
        Ok(page) => page,
        Err(err) => {
            error!("Error searching issues for filter {filter_id}: {err}");
            return FilterSelection::empty();
        }
    };

    let issue_key = page
        .issues
        .iter()
        .map(|record| record.key.as_str())
        .find(|key| Some(*key) != exclude_key)
        .map(str::to_string);

    let total = match client.search_jql(&jql, COUNT_PAGE_CAP, &["key"], None).await {
        Ok(count_page) => {
            let excluded_present = exclude_key
                .map(|key| count_page.issues.iter().any(|record| record.key == key))
                .unwrap_or(false);
            let count = count_page.issues.len() as u64 - u64::from(excluded_present);
            // Any indication of a further page makes the count a lower bound,
            // whether the page came back full or not.
            if count_page.has_more() {
                FilterTotal::AtLeast(count)
            } else {
                FilterTotal::Exact(count)
            }
        }
        Err(err) => {
            // Best-effort fallback: count what the candidate batch showed.
            warn!("Failed to recount filter {filter_id} results: {err}");
            let visible = page
                .issues
                .iter()
                .filter(|record| Some(record.key.as_str()) != exclude_key)
                .count() as u64;
            if page.has_more() {
                FilterTotal::AtLeast(visible)
            } else {
                FilterTotal::Exact(visible)
            }
        }
    };

    debug!(
        "Filter {filter_id} -> candidate {:?}, total {total}",
        issue_key
    );
    FilterSelection { issue_key, total }
}
