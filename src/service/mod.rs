//! Orchestration services over the Jira client: hierarchy traversal,
//! worklog aggregation, filter-driven selection and issue updates.

pub mod hierarchy;
pub mod search;
pub mod update;
pub mod worklogs;

pub use hierarchy::{issue_hierarchy, Issue};
pub use search::{next_issue_from_filter, FilterSelection, FilterTotal};
pub use update::{apply_update, watch_issue};
pub use worklogs::{recent_worklogs, WorklogIssue, WorklogReport};
