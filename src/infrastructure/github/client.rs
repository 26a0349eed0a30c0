use crate::common::{CohoError, CohoResult};
use crate::domain::entities::GITHUB_ORG;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com/";

const PAGE_SIZE: usize = 100;
const USER_AGENT: &str = concat!("coho/", env!("CARGO_PKG_VERSION"));

/// Author of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// The fields of a pull request coho reports on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: GitHubUser,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal GitHub REST client.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> CohoResult<Self> {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Client talking to another API root, e.g. a local test server.
    pub fn with_api_base(api_base: &str, token: Option<String>) -> CohoResult<Self> {
        let api_base = Url::parse(api_base).map_err(|e| {
            CohoError::config_error_with_source(format!("Invalid API URL: {}", api_base), e)
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CohoError::network_error_with_source("Failed to create HTTP client", None, e)
            })?;

        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// URL of one page of open pull requests for `repo_name`.
    pub fn pulls_url(&self, repo_name: &str, page: usize) -> CohoResult<Url> {
        let mut url = self
            .api_base
            .join(&format!("repos/{}/{}/pulls", GITHUB_ORG, repo_name))
            .map_err(|e| CohoError::internal_error(format!("Invalid pulls URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("state", "open")
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Every open pull request of `repo_name`, newest first as GitHub returns them.
    pub async fn open_pulls(&self, repo_name: &str) -> CohoResult<Vec<PullRequest>> {
        let mut pulls = Vec::new();
        let mut page = 1;

        loop {
            let url = self.pulls_url(repo_name, page)?;
            let batch = self.fetch_page(url).await?;
            let fetched = batch.len();
            pulls.extend(batch);
            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!(repo = repo_name, count = pulls.len(), "pull requests fetched");
        Ok(pulls)
    }

    async fn fetch_page(&self, url: Url) -> CohoResult<Vec<PullRequest>> {
        let mut request = self
            .http
            .get(url.clone())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            CohoError::network_error_with_source("GitHub request failed", Some(url.to_string()), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CohoError::network_error(
                format!("GitHub responded with {}", status),
                Some(url.to_string()),
            ));
        }

        response.json::<Vec<PullRequest>>().await.map_err(|e| {
            CohoError::network_error_with_source(
                "Unexpected GitHub response",
                Some(url.to_string()),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PULLS: &str = r#"[
      {
        "number": 1021,
        "title": "fix: gradle wrapper",
        "html_url": "https://github.com/apache/cordova-android/pull/1021",
        "user": { "login": "breautek" },
        "created_at": "2020-06-01T10:00:00Z",
        "updated_at": "2020-06-03T12:30:00Z",
        "state": "open"
      }
    ]"#;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).to_string()
        });
        (format!("http://{}/", addr), handle)
    }

    #[test]
    fn test_pulls_url() {
        let client = GitHubClient::new(None).unwrap();
        let url = client.pulls_url("cordova-ios", 2).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/apache/cordova-ios/pulls?state=open&per_page=100&page=2"
        );
    }

    #[tokio::test]
    async fn test_open_pulls() {
        let (base, server) = serve_once("200 OK", PULLS).await;
        let client = GitHubClient::with_api_base(&base, Some("secret".to_string())).unwrap();

        let pulls = client.open_pulls("cordova-android").await.unwrap();
        assert_eq!(pulls.len(), 1);
        assert_eq!(pulls[0].number, 1021);
        assert_eq!(pulls[0].user.login, "breautek");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /repos/apache/cordova-android/pulls?"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (base, _server) = serve_once("403 Forbidden", "{}").await;
        let client = GitHubClient::with_api_base(&base, None).unwrap();

        let error = client.open_pulls("cordova-android").await.unwrap_err();
        assert!(matches!(error, CohoError::NetworkError { .. }));
        assert!(error.to_string().contains("403"));
    }
}
