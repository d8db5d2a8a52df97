use crate::config::JiraConfig;
use crate::error::{JiraError, Result};
use crate::models::{FilterDetails, IssueRecord, SearchPage, UserProfile, WorklogPage};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Fields expanded on single-issue reads so the embedded worklog travels with
/// the response.
const ISSUE_EXPAND: &str = "renderedFields,worklog";

/// Authenticated Jira REST client scoped to one set of credentials. Cheap to
/// construct per request; holds no state beyond the underlying HTTP pool.
#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::GET, path, Option::<&Value>::None, None)
            .await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::GET, path, Option::<&Value>::None, Some(query))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, path, Some(body), None).await
    }

    async fn send_with_body<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!("{method} {url}");
        let mut request = self.http.request(method, url);
        if let Some(params) = query {
            request = request.query(params);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    pub async fn send_expect_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!("{method} {url}");
        let mut request = self.http.request(method, url);
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::ensure_success(response).await
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(JiraError::from)
        } else {
            Err(Self::response_error(status, response).await)
        }
    }

    async fn ensure_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::response_error(status, response).await)
        }
    }

    async fn response_error(status: StatusCode, response: Response) -> JiraError {
        let body = response.text().await.unwrap_or_default();
        debug!("Jira responded {status}: {body}");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            JiraError::Authentication(format!("Access denied ({}) - {}", status, body))
        } else {
            JiraError::http(status, body)
        }
    }

    /// Reads a single issue with its fields and embedded worklog expanded.
    pub async fn get_issue(&self, issue_key: &str) -> Result<IssueRecord> {
        let path = format!("issue/{}", issue_key);
        self.get_with_query(&path, &[("expand", ISSUE_EXPAND)]).await
    }

    /// Resolves a saved filter to its stored JQL.
    pub async fn get_filter(&self, filter_id: &str) -> Result<FilterDetails> {
        let path = format!("filter/{}", filter_id);
        self.get(&path).await
    }

    /// Runs a JQL query against the paginated search endpoint, requesting
    /// only the named fields.
    pub async fn search_jql(
        &self,
        jql: &str,
        max_results: u32,
        fields: &[&str],
        next_page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let payload = SearchJqlRequest {
            jql,
            max_results,
            fields,
            next_page_token,
        };
        self.post("search/jql", &payload).await
    }

    /// Fetches the complete worklog list for one issue. Search responses do
    /// not carry full per-entry worklog data, hence the separate call.
    pub async fn get_issue_worklog(&self, issue_key: &str) -> Result<WorklogPage> {
        let path = format!("issue/{}/worklog", issue_key);
        self.get(&path).await
    }

    /// Writes a partial fields payload to an issue. Jira signals success with
    /// 204 No Content.
    pub async fn update_issue_fields(&self, issue_key: &str, fields: &Value) -> Result<()> {
        let path = format!("issue/{}", issue_key);
        let payload = IssueUpdateRequest { fields };
        self.send_expect_empty(Method::PUT, &path, Some(&payload)).await
    }

    /// Returns the calling user's profile.
    pub async fn get_myself(&self) -> Result<UserProfile> {
        self.get("myself").await
    }

    /// Registers an account as a watcher of an issue. The watcher endpoint
    /// takes the account id as a bare JSON string.
    pub async fn add_watcher(&self, issue_key: &str, account_id: &str) -> Result<()> {
        let path = format!("issue/{}/watchers", issue_key);
        self.send_expect_empty(Method::POST, &path, Some(account_id)).await
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let credentials = BASE64_STANDARD.encode(format!("{}:{}", config.email, config.api_token));
    let mut auth_value = header_value(format!("Basic {}", credentials))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchJqlRequest<'a> {
    jql: &'a str,
    max_results: u32,
    fields: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page_token: Option<&'a str>,
}

#[derive(Serialize)]
struct IssueUpdateRequest<'a> {
    fields: &'a Value,
}
