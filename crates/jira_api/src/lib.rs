//! Typed Jira Cloud REST API v3 client used by the triage backend.

pub mod client;
pub mod config;
pub mod description;
pub mod error;
pub mod fields;
pub mod links;
pub mod models;

pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{JiraError, Result};
pub use links::{IssueLink, RELATION_PARENT, RELATION_SELF};
pub use models::{
    FilterDetails, IssueRecord, SearchPage, UserProfile, WorklogAuthor, WorklogEntry, WorklogPage,
};
