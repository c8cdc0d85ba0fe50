//! GitHub REST v3 client.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::http::check_response;
use crate::{
    CreatedIssue, Issue, IssueComment, IssueSummary, IssueTracker, Milestone, NewIssue,
    TrackerError,
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<IssueSummary>,
}

/// Client bound to one `owner/name` repository.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    repository: String,
    token: String,
}

impl GithubClient {
    /// Create a client for `repository` (`owner/name`) using `token`.
    ///
    /// # Errors
    ///
    /// [`TrackerError::InvalidRepository`] when `repository` is not
    /// `owner/name`, [`TrackerError::Http`] when the HTTP client cannot be
    /// built.
    pub fn new(api_url: &str, repository: &str, token: &str) -> Result<Self, TrackerError> {
        let valid = repository
            .split_once('/')
            .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
        if !valid {
            return Err(TrackerError::InvalidRepository(repository.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        let http = reqwest::Client::builder()
            .user_agent(concat!("commenter/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
        })
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{path}", self.api_url, self.repository)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, TrackerError> {
        debug!(url, "GET");
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        let resp = check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TrackerError::Parse(e.to_string()))
    }
}

impl IssueTracker for GithubClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        let url = self.repo_url("/issues");
        debug!(url, title = %issue.title, "POST");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(issue)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TrackerError::Parse(e.to_string()))
    }

    async fn search_issues(&self, query: &str) -> Result<Vec<IssueSummary>, TrackerError> {
        let url = format!(
            "{}/search/issues?q={}&per_page={PER_PAGE}",
            self.api_url,
            urlencoding::encode(query)
        );
        let data: SearchResponse = self.get(&url).await?;
        Ok(data.items)
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, TrackerError> {
        self.get(&self.repo_url(&format!("/issues/{number}"))).await
    }

    async fn list_issue_comments(&self, number: u64) -> Result<Vec<IssueComment>, TrackerError> {
        let mut comments = Vec::new();
        for page in 1.. {
            let url = self.repo_url(&format!(
                "/issues/{number}/comments?per_page={PER_PAGE}&page={page}"
            ));
            let batch: Vec<IssueComment> = self.get(&url).await?;
            let last = batch.len() < PER_PAGE;
            comments.extend(batch);
            if last {
                break;
            }
        }
        Ok(comments)
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>, TrackerError> {
        let mut milestones = Vec::new();
        for page in 1.. {
            let url = self.repo_url(&format!(
                "/milestones?state=all&per_page={PER_PAGE}&page={page}"
            ));
            let batch: Vec<Milestone> = self.get(&url).await?;
            let last = batch.len() < PER_PAGE;
            milestones.extend(batch);
            if last {
                break;
            }
        }
        Ok(milestones)
    }
}
