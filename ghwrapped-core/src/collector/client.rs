//! HTTP client for the GitHub GraphQL API
//!
//! One POST per query, bearer-token auth, bounded exponential backoff on
//! transient failures.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GitHubConfig;
use crate::error::{Error, Result};

use super::responses::GraphQlResponse;

/// HTTP client for GitHub GraphQL
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a new client authenticated with `token`
    ///
    /// Returns an error if the configuration is invalid or the token cannot
    /// be used as a header value.
    pub fn new(config: GitHubConfig, token: &str) -> Result<Self> {
        config.validate()?;

        if token.trim().is_empty() {
            return Err(Error::Config("a GitHub token is required".to_string()));
        }

        let api_url = config.api_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ghwrapped"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| Error::Config(format!("invalid GitHub token: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            api_url,
        })
    }

    /// Run one GraphQL query
    ///
    /// Transport failures and 5xx responses map to [`Error::Http`]; any
    /// other non-success status and GraphQL `errors` map to [`Error::GitHub`].
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let request_body = QueryRequest { query, variables };
        tracing::debug!(operation = operation_name(query), "Sending GraphQL query");

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            let body: GraphQlResponse<T> = response
                .json()
                .await
                .map_err(|e| Error::GitHub(format!("failed to parse response: {}", e)))?;
            body.into_result()
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            let message = format!("API error ({}): {}", status, error_text);
            if status.is_server_error() {
                Err(Error::Http(message))
            } else {
                Err(Error::GitHub(message))
            }
        }
    }

    /// Run a query, retrying transient failures with exponential backoff.
    pub async fn query_with_retry<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "Retrying GraphQL query (attempt {}/{}), waiting {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            match self.query(query, variables.clone()).await {
                Ok(data) => return Ok(data),
                Err(e) if is_retryable_error(&e) => {
                    tracing::warn!("Transient error querying GitHub: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Http("max retries exceeded".to_string())))
    }

    /// Safety cap on nodes per paginated query
    pub fn max_nodes(&self) -> usize {
        self.config.max_nodes
    }
}

/// Request body for POST /graphql
#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

/// `PullRequests` from `query PullRequests(...)`, for logs.
fn operation_name(query: &str) -> &str {
    query
        .split_whitespace()
        .skip_while(|word| *word != "query")
        .nth(1)
        .and_then(|name| name.split('(').next())
        .unwrap_or("anonymous")
}

/// Transport errors and 5xx responses are worth retrying.
fn is_retryable_error(error: &Error) -> bool {
    matches!(error, Error::Http(_))
}
