use std::time::Duration;

pub const API_PREFIX: &str = "rest/api/3";
pub const DEFAULT_USER_AGENT: &str = "jira-triage";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for one authenticated Jira client. Credentials are
/// request-scoped values supplied by the caller, never looked up from ambient
/// state.
#[derive(Clone, Debug)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl JiraConfig {
    /// Creates a config for a cloud instance host such as
    /// `example.atlassian.net`.
    pub fn new(
        instance: impl AsRef<str>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        let host = instance.as_ref().trim_matches('/');
        Self {
            base_url: format!("https://{}", host),
            email: email.into(),
            api_token: api_token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Overrides the full base URL, primarily so tests can point the client
    /// at a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    pub fn api_root(&self) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), API_PREFIX)
    }
}
