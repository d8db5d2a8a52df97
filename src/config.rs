//! Environment-driven application configuration.

use std::env;
use std::path::PathBuf;

/// Research projects the reporting views know about; buckets with zero logged
/// hours in the trailing window are reported from this list.
pub const KNOWN_RESEARCH_PROJECTS: [&str; 10] = [
    "6G-NETFAB",
    "GREENFIELD",
    "INTENSE",
    "N-DOLLI",
    "QuINSiDa",
    "SASPIT",
    "SUSTAINET",
    "SHINKA",
    "PARTIALLY ASSIGNABLE",
    "NOT ASSIGNABLE",
];

fn default_jira_instance() -> String {
    "infosim.atlassian.net".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from("/shared/session_data.json")
}

fn default_updated_issues_log() -> PathBuf {
    PathBuf::from("/shared/updated_issues.log")
}

fn default_filter_id() -> String {
    "10456".to_string()
}

/// Represents the backend configuration resolved from the environment,
/// including the bind address, the default Jira instance, persisted file
/// paths and the instance-specific custom field ids.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jira_instance: String,
    /// Full base URL override for the Jira API; when set it wins over
    /// `jira_instance`. Used to point the backend at a mock server.
    pub jira_base_url: Option<String>,
    pub session_file: PathBuf,
    pub updated_issues_log: PathBuf,
    pub default_filter_id: String,
    pub research_project_field: String,
    pub chargeable_field: String,
}

impl Default for AppConfig {
    /// Returns baseline config when the environment supplies nothing.
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            jira_instance: default_jira_instance(),
            jira_base_url: None,
            session_file: default_session_file(),
            updated_issues_log: default_updated_issues_log(),
            default_filter_id: default_filter_id(),
            research_project_field: "customfield_10097".to_string(),
            chargeable_field: "customfield_10384".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves config from the process environment, falling back to
    /// defaults per field.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("BIND_HOST").unwrap_or(defaults.host),
            port: env::var("BIND_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.port),
            jira_instance: env::var("JIRA_INSTANCE").unwrap_or(defaults.jira_instance),
            jira_base_url: env::var("JIRA_BASE_URL").ok(),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            updated_issues_log: env::var("UPDATED_ISSUES_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.updated_issues_log),
            default_filter_id: env::var("DEFAULT_FILTER_ID").unwrap_or(defaults.default_filter_id),
            research_project_field: env::var("RESEARCH_PROJECT_FIELD")
                .unwrap_or(defaults.research_project_field),
            chargeable_field: env::var("CHARGEABLE_FIELD").unwrap_or(defaults.chargeable_field),
        }
    }
}
