//! Aggregation of time logged by one user over a trailing window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use jira_api::models::WorklogEntry;
use jira_api::{fields, JiraClient};
use serde::Serialize;
use tracing::{debug, warn};

pub const WORKLOG_WINDOW_DAYS: i64 = 14;
/// Page size for the "issues with my worklogs" search. One page is plenty
/// for two weeks of one person's logging; when a user exceeds it anyway the
/// overflow is logged and only the first page is aggregated.
pub const WORKLOG_PAGE_SIZE: u32 = 100;

/// Timestamp layout used by Jira worklog entries, e.g.
/// `2024-01-15T09:30:00.000+0100`.
const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Per-issue rollup of the hours a user logged within the window.
#[derive(Debug, Clone, Serialize)]
pub struct WorklogIssue {
    pub key: String,
    pub name: String,
    pub research_project: String,
    pub time_spent_hours: f64,
}

/// Aggregated outcome: the flat per-issue list plus hours grouped by
/// research project. A project key is present only when its hours are
/// strictly positive.
#[derive(Debug, Default)]
pub struct WorklogReport {
    pub issues: Vec<WorklogIssue>,
    pub hours_by_project: HashMap<String, f64>,
}

impl WorklogReport {
    /// Buckets sorted by hours, highest first.
    pub fn sorted_projects(&self) -> Vec<(String, f64)> {
        let mut sorted: Vec<_> = self
            .hours_by_project
            .iter()
            .map(|(project, hours)| (project.clone(), *hours))
            .collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Known projects that saw no logged time during the window.
    pub fn projects_without_time<'a>(&self, known: &[&'a str]) -> Vec<&'a str> {
        known
            .iter()
            .filter(|project| !self.hours_by_project.contains_key(**project))
            .copied()
            .collect()
    }
}

/// Aggregates the hours `assignee_id` logged in the trailing window ending at
/// `now`. Returns an empty report without any outbound call when the assignee
/// is absent; search or sub-fetch failures degrade to empty/zero
/// contributions instead of aborting.
pub async fn recent_worklogs(
    client: &JiraClient,
    research_project_field: &str,
    assignee_id: Option<&str>,
    now: DateTime<Utc>,
) -> WorklogReport {
    let Some(assignee_id) = assignee_id else {
        warn!("No valid assignee ID found, skipping worklog lookup.");
        return WorklogReport::default();
    };

    debug!("Fetching worklogs for assignee {assignee_id}");
    let jql = format!(
        "worklogAuthor = {assignee_id} AND worklogDate >= -{WORKLOG_WINDOW_DAYS}d"
    );
    let page = match client
        .search_jql(
            &jql,
            WORKLOG_PAGE_SIZE,
            &["summary", research_project_field],
            None,
        )
        .await
    {
        Ok(page) => page,
        Err(err) => {
            warn!("Failed to search issues with recent worklogs: {err}");
            return WorklogReport::default();
        }
    };
    if page.has_more() {
        warn!(
            "More than {WORKLOG_PAGE_SIZE} issues carry recent worklogs for \
             {assignee_id}; aggregating the first page only"
        );
    }

    let cutoff = now - Duration::days(WORKLOG_WINDOW_DAYS);
    let mut report = WorklogReport::default();

    for record in &page.issues {
        // The search response does not carry complete per-entry worklog
        // data, so each issue needs its own worklog fetch.
        let hours = match client.get_issue_worklog(&record.key).await {
            Ok(worklog) => filtered_hours(&worklog.worklogs, assignee_id, cutoff),
            Err(err) => {
                warn!("Failed to fetch worklogs for {}: {err}", record.key);
                0.0
            }
        };

        if hours > 0.0 {
            let project = fields::option_value_of(&record.fields, research_project_field);
            *report.hours_by_project.entry(project.clone()).or_insert(0.0) += hours;
            report.issues.push(WorklogIssue {
                key: record.key.clone(),
                name: fields::summary_of(&record.fields),
                research_project: project,
                time_spent_hours: fields::round_hours(hours),
            });
        }
    }

    debug!(
        "Worklogs retrieved: {:?}, total issues: {}",
        report.hours_by_project,
        report.issues.len()
    );
    report
}

/// Sums the hours of entries authored by `assignee_id` that started at or
/// after `cutoff`. Entries whose timestamp cannot be parsed are excluded.
fn filtered_hours(entries: &[WorklogEntry], assignee_id: &str, cutoff: DateTime<Utc>) -> f64 {
    entries
        .iter()
        .filter(|entry| {
            entry
                .author
                .as_ref()
                .and_then(|author| author.account_id.as_deref())
                == Some(assignee_id)
        })
        .filter(|entry| match entry.started.as_deref().map(parse_started) {
            Some(Some(started)) => started >= cutoff,
            _ => false,
        })
        .map(|entry| entry.time_spent_seconds.unwrap_or(0) as f64 / 3600.0)
        .sum()
}

/// Parses a worklog start timestamp into a timezone-aware instant. Jira emits
/// a fixed offset without a colon; RFC 3339 covers the rest.
fn parse_started(started: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(started, STARTED_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(started))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
