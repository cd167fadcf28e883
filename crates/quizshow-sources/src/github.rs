//! Question banks stored as `.txt` files in a GitHub repository folder.
//!
//! Listing goes through the contents API; fetching reads the raw file.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{Response, Url};
use serde::Deserialize;
use tracing::instrument;

use quizshow_core::parser::decode;
use quizshow_core::traits::{BankEntry, BankSource};

use crate::error::{check_bank_name, SourceError};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("quizshow/", env!("CARGO_PKG_VERSION"));

/// Location of the bank folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubLocation {
    pub owner: String,
    pub repo: String,
    /// Folder inside the repository, e.g. "LISTAS".
    pub path: String,
    pub branch: String,
}

/// A folder of bank files in a GitHub repository.
pub struct GitHubSource {
    location: GitHubLocation,
    token: Option<String>,
    api_url: String,
    raw_url: String,
    client: reqwest::Client,
}

impl GitHubSource {
    pub fn new(location: GitHubLocation, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            location,
            token: token.filter(|t| !t.is_empty()),
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            client,
        }
    }

    /// Point the source at different API and raw-content hosts.
    pub fn with_base_urls(mut self, api_url: Option<String>, raw_url: Option<String>) -> Self {
        if let Some(api) = api_url {
            self.api_url = api.trim_end_matches('/').to_string();
        }
        if let Some(raw) = raw_url {
            self.raw_url = raw.trim_end_matches('/').to_string();
        }
        self
    }

    /// Whether requests carry a token. Unauthenticated GitHub API access is
    /// limited to 60 requests per hour.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            if let Ok(value) = format!("token {token}").parse() {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    fn url(base: &str, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = Url::parse(base)
            .map_err(|e| SourceError::NetworkError(format!("invalid base URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::NetworkError(format!("invalid base URL {base}")))?
            .pop_if_empty()
            .extend(segments.iter().flat_map(|s| s.split('/')).filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn contents_url(&self) -> Result<Url, SourceError> {
        let loc = &self.location;
        let mut url = Self::url(
            &self.api_url,
            &["repos", &loc.owner, &loc.repo, "contents", &loc.path],
        )?;
        url.query_pairs_mut().append_pair("ref", &loc.branch);
        Ok(url)
    }

    fn raw_file_url(&self, name: &str) -> Result<Url, SourceError> {
        let loc = &self.location;
        let mut url = Self::url(
            &self.raw_url,
            &[&loc.owner, &loc.repo, &loc.branch, &loc.path],
        )?;
        // Pushed separately so spaces and other characters are escaped.
        url.path_segments_mut()
            .map_err(|_| SourceError::NetworkError(format!("invalid base URL {}", self.raw_url)))?
            .push(name);
        Ok(url)
    }
}

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct GitHubError {
    message: String,
}

/// Map an HTTP error status to a [`SourceError`], passing successes through.
async fn check_status(response: Response, what: &str) -> Result<Response, SourceError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");
    let reset = response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GitHubError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(match status {
        403 | 429 if exhausted || status == 429 => SourceError::RateLimited(match reset {
            Some(epoch) => format!("{message} (limit resets at unix time {epoch})"),
            None => message,
        }),
        401 | 403 => SourceError::AuthenticationFailed(message),
        404 => SourceError::NotFound(what.to_string()),
        _ => SourceError::ApiError { status, message },
    })
}

#[async_trait]
impl BankSource for GitHubSource {
    fn name(&self) -> &str {
        "github"
    }

    #[instrument(skip(self), fields(repo = %self.location.repo, path = %self.location.path))]
    async fn list(&self) -> anyhow::Result<Vec<BankEntry>> {
        let url = self.contents_url()?;
        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, DEFAULT_TIMEOUT_SECS))?;

        let what = format!(
            "{}/{}/{}",
            self.location.owner, self.location.repo, self.location.path
        );
        let response = check_status(response, &what).await?;

        let entries: Vec<ContentEntry> =
            response.json().await.map_err(|e| SourceError::ApiError {
                status: 0,
                message: format!("failed to parse contents listing: {e}"),
            })?;

        let mut banks: Vec<BankEntry> = entries
            .into_iter()
            .filter(|e| e.kind.as_deref().is_none_or(|k| k == "file"))
            .filter(|e| e.name.ends_with(".txt"))
            .map(|e| BankEntry {
                name: e.name,
                size: e.size,
            })
            .collect();
        banks.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(count = banks.len(), "listed remote banks");
        Ok(banks)
    }

    #[instrument(skip(self), fields(repo = %self.location.repo))]
    async fn fetch(&self, name: &str) -> anyhow::Result<String> {
        check_bank_name(name)?;
        let url = self.raw_file_url(name)?;

        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, DEFAULT_TIMEOUT_SECS))?;
        let response = check_status(response, name).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::NetworkError(format!("failed to read {name}: {e}")))?;
        tracing::info!(bank = name, bytes = bytes.len(), "fetched remote bank");
        Ok(decode(&bytes)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizshow_core::error::BankError;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, token: Option<&str>) -> GitHubSource {
        GitHubSource::new(
            GitHubLocation {
                owner: "octo".into(),
                repo: "quiz-banks".into(),
                path: "LISTAS".into(),
                branch: "main".into(),
            },
            token.map(String::from),
        )
        .with_base_urls(Some(server.uri()), Some(format!("{}/raw/", server.uri())))
    }

    #[tokio::test]
    async fn lists_only_txt_files() {
        let server = MockServer::start().await;

        let body = serde_json::json!([
            {"name": "zoo.txt", "size": 120, "type": "file"},
            {"name": "README.md", "size": 10, "type": "file"},
            {"name": "CLUB ATLETICO HURACAN.txt", "size": 2048, "type": "file"},
            {"name": "old.txt", "type": "dir"}
        ]);

        Mock::given(method("GET"))
            .and(path("/repos/octo/quiz-banks/contents/LISTAS"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let banks = source(&server, None).list().await.unwrap();
        let names: Vec<&str> = banks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["CLUB ATLETICO HURACAN.txt", "zoo.txt"]);
        assert_eq!(banks[0].size, Some(2048));
    }

    #[tokio::test]
    async fn fetch_escapes_name_and_sends_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/octo/quiz-banks/main/LISTAS/CLUB%20ATLETICO%20HURACAN.txt"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1. Q\nA. a\nB. b\nC. c\nD. d\n"))
            .mount(&server)
            .await;

        let src = source(&server, Some("s3cret"));
        assert!(src.is_authenticated());
        let text = src.fetch("CLUB ATLETICO HURACAN.txt").await.unwrap();
        assert!(text.starts_with("1. Q"));
    }

    #[tokio::test]
    async fn non_utf8_bank_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/octo/quiz-banks/main/LISTAS/latin1.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"1. Caf\xe9?\nA. a\nB. b*\nC. c\nD. d\n".to_vec()),
            )
            .mount(&server)
            .await;

        let err = source(&server, None).fetch("latin1.txt").await.unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
        let err = err.downcast::<BankError>().unwrap();
        assert!(matches!(err, BankError::Encoding { offset: 6 }));
    }

    #[tokio::test]
    async fn missing_bank_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
            .mount(&server)
            .await;

        let err = source(&server, None).fetch("nope.txt").await.unwrap_err();
        let err = err.downcast::<SourceError>().unwrap();
        assert!(matches!(err, SourceError::NotFound(ref n) if n == "nope.txt"));
    }

    #[tokio::test]
    async fn exhausted_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
            )
            .mount(&server)
            .await;

        let err = source(&server, None).list().await.unwrap_err();
        let err = err.downcast::<SourceError>().unwrap();
        match err {
            SourceError::RateLimited(msg) => {
                assert!(msg.contains("API rate limit exceeded"));
                assert!(msg.contains("1700000000"));
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Bad credentials"})),
            )
            .mount(&server)
            .await;

        let err = source(&server, Some("wrong")).list().await.unwrap_err();
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[tokio::test]
    async fn rejects_path_traversal_without_request() {
        let server = MockServer::start().await;
        let err = source(&server, None).fetch("../x.txt").await.unwrap_err();
        assert!(err.to_string().contains("invalid bank name"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
