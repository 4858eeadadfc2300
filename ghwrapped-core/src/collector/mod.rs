//! GitHub activity collector
//!
//! Gathers one year of a user's public activity from the GitHub GraphQL API
//! and assembles it into [`RawEvents`] for the profile engine.
//!
//! ## Pagination
//!
//! Pull requests, issues, issue comments and created repositories are read
//! newest first, 50 per page. Paging stops at the first page that reaches
//! past the window start, when the API reports no further page, on an empty
//! page, or once [`GitHubConfig::max_nodes`] nodes have been gathered. A
//! failure after the first page keeps what was already gathered.
//!
//! ## Failure policy
//!
//! The contribution calendar and per-repository commit counts are required;
//! their errors propagate. Every other source degrades to an empty list with
//! a warning so one flaky query cannot sink a whole report.

mod client;
mod queries;
mod responses;

pub use client::GitHubClient;
pub use responses::Viewer;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{Error, Result};
use crate::period::YearWindow;
use crate::types::{
    Collaboration, CommentEvent, ContributionCalendar, CreatedRepo, IssueEvent, PullRequestEvent,
    RawEvents, RepoContribution, RepoLanguages, ReviewEvent,
};

use responses::{
    ByRepoData, CalendarData, Connection, CreatedReposData, IssueCommentsData, IssuesData,
    LanguagesData, PullRequestsData, ReviewsData, Timestamped, ViewerData,
};

/// Stage reported to the progress callback of [`Collector::collect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectStep {
    Calendar,
    Repositories,
    Languages,
    Collaboration,
}

impl CollectStep {
    pub fn description(&self) -> &'static str {
        match self {
            CollectStep::Calendar => "Fetching contribution calendar",
            CollectStep::Repositories => "Fetching commit contributions by repository",
            CollectStep::Languages => "Fetching repository languages",
            CollectStep::Collaboration => "Fetching pull requests, reviews, issues and comments",
        }
    }
}

/// Reads a user's yearly activity through a [`GitHubClient`].
pub struct Collector {
    client: GitHubClient,
}

impl Collector {
    /// Build a collector.
    ///
    /// `token_override` wins over `[github].token` and `GITHUB_TOKEN`.
    pub fn new(config: &GitHubConfig, token_override: Option<&str>) -> Result<Self> {
        let token = token_override
            .map(str::to_string)
            .or_else(|| config.resolved_token())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "GitHub token not set (use --token, [github].token or GITHUB_TOKEN)"
                        .to_string(),
                )
            })?;

        Ok(Self {
            client: GitHubClient::new(config.clone(), &token)?,
        })
    }

    /// The user the token belongs to.
    pub async fn fetch_viewer(&self) -> Result<Viewer> {
        let data: ViewerData = self
            .client
            .query_with_retry(queries::VIEWER_QUERY, json!({}))
            .await?;
        Ok(data.viewer)
    }

    pub async fn fetch_calendar(
        &self,
        login: &str,
        window: &YearWindow,
    ) -> Result<ContributionCalendar> {
        let data: CalendarData = self
            .client
            .query_with_retry(queries::CALENDAR_QUERY, windowed_variables(login, window))
            .await?;

        let user = data.user.ok_or_else(|| user_not_found(login))?;
        Ok(user
            .contributions_collection
            .and_then(|c| c.contribution_calendar)
            .unwrap_or_default())
    }

    /// Commit contributions per repository, busiest first.
    ///
    /// Equal counts keep the order the API returned them in.
    pub async fn fetch_repo_contributions(
        &self,
        login: &str,
        window: &YearWindow,
    ) -> Result<Vec<RepoContribution>> {
        let data: ByRepoData = self
            .client
            .query_with_retry(queries::REPO_CONTRIB_QUERY, windowed_variables(login, window))
            .await?;

        let user = data.user.ok_or_else(|| user_not_found(login))?;
        let mut by_repo = user
            .contributions_collection
            .and_then(|c| c.commit_contributions_by_repository)
            .unwrap_or_default();

        by_repo.sort_by(|a, b| b.contributions.total_count.cmp(&a.contributions.total_count));
        Ok(by_repo)
    }

    /// Language sizes for the user's own non-fork repositories.
    pub async fn fetch_languages(&self, login: &str) -> Result<Vec<RepoLanguages>> {
        let data: LanguagesData = self
            .client
            .query_with_retry(queries::LANGUAGES_QUERY, json!({ "login": login }))
            .await?;

        Ok(data
            .user
            .and_then(|u| u.repositories)
            .map(|r| r.into_nodes())
            .unwrap_or_default())
    }

    pub async fn fetch_pull_requests(
        &self,
        login: &str,
        window: &YearWindow,
    ) -> Result<Vec<PullRequestEvent>> {
        self.fetch_paginated(queries::PRS_QUERY, login, window, |data: PullRequestsData| {
            data.user.and_then(|u| u.pull_requests)
        })
        .await
    }

    /// Review contributions inside the window, as `{submittedAt, state}`.
    pub async fn fetch_reviews(&self, login: &str, window: &YearWindow) -> Result<Vec<ReviewEvent>> {
        let data: ReviewsData = self
            .client
            .query_with_retry(queries::REVIEWS_QUERY, windowed_variables(login, window))
            .await?;

        Ok(data
            .user
            .and_then(|u| u.contributions_collection)
            .and_then(|c| c.pull_request_review_contributions)
            .map(|n| n.into_nodes().into_iter().map(ReviewEvent::from).collect())
            .unwrap_or_default())
    }

    pub async fn fetch_issues(&self, login: &str, window: &YearWindow) -> Result<Vec<IssueEvent>> {
        self.fetch_paginated(queries::ISSUES_QUERY, login, window, |data: IssuesData| {
            data.user.and_then(|u| u.issues)
        })
        .await
    }

    pub async fn fetch_issue_comments(
        &self,
        login: &str,
        window: &YearWindow,
    ) -> Result<Vec<CommentEvent>> {
        self.fetch_paginated(
            queries::COMMENTS_QUERY,
            login,
            window,
            |data: IssueCommentsData| data.user.and_then(|u| u.issue_comments),
        )
        .await
    }

    /// Repositories created inside the window that have at least one commit.
    pub async fn fetch_created_repos(
        &self,
        login: &str,
        window: &YearWindow,
    ) -> Result<Vec<CreatedRepo>> {
        let nodes = self
            .fetch_paginated(
                queries::CREATED_REPOS_QUERY,
                login,
                window,
                |data: CreatedReposData| data.user.and_then(|u| u.repositories),
            )
            .await?;

        Ok(nodes
            .into_iter()
            .filter(|node| node.commit_count() > 0)
            .map(CreatedRepo::from)
            .collect())
    }

    /// Collect everything for `login` in `window`.
    ///
    /// `progress` is called once per [`CollectStep`], in order.
    pub async fn collect<F>(
        &self,
        login: &str,
        window: &YearWindow,
        mut progress: F,
    ) -> Result<RawEvents>
    where
        F: FnMut(CollectStep),
    {
        tracing::info!(login = %login, year = window.year(), "Collecting GitHub activity");

        progress(CollectStep::Calendar);
        let calendar = self.fetch_calendar(login, window).await?;

        progress(CollectStep::Repositories);
        let by_repo = self.fetch_repo_contributions(login, window).await?;

        progress(CollectStep::Languages);
        let languages = or_empty("languages", self.fetch_languages(login).await);

        progress(CollectStep::Collaboration);
        let (prs, reviews, issues, comments, created_repos) = tokio::join!(
            self.fetch_pull_requests(login, window),
            self.fetch_reviews(login, window),
            self.fetch_issues(login, window),
            self.fetch_issue_comments(login, window),
            self.fetch_created_repos(login, window),
        );

        let raw = RawEvents {
            calendar,
            by_repo,
            languages,
            collaboration: Collaboration {
                prs: or_empty("pull requests", prs),
                reviews: or_empty("reviews", reviews),
                issues: or_empty("issues", issues),
                comments: or_empty("issue comments", comments),
            },
            created_repos: or_empty("created repositories", created_repos),
        };

        tracing::info!(
            days = raw.calendar.days().count(),
            repos = raw.by_repo.len(),
            prs = raw.collaboration.prs.len(),
            reviews = raw.collaboration.reviews.len(),
            issues = raw.collaboration.issues.len(),
            comments = raw.collaboration.comments.len(),
            created = raw.created_repos.len(),
            "Collection complete"
        );

        Ok(raw)
    }

    /// Page through a newest-first connection until it leaves the window.
    async fn fetch_paginated<D, N, F>(
        &self,
        query: &str,
        login: &str,
        window: &YearWindow,
        extract: F,
    ) -> Result<Vec<N>>
    where
        D: DeserializeOwned,
        N: Timestamped,
        F: Fn(D) -> Option<Connection<N>>,
    {
        let max_nodes = self.client.max_nodes();
        let mut gathered: Vec<N> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0usize;

        loop {
            let variables = json!({ "login": login, "cursor": cursor });
            let data: D = match self.client.query_with_retry(query, variables).await {
                Ok(data) => data,
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Pagination stopped after {} pages, keeping {} nodes: {}",
                        page,
                        gathered.len(),
                        e
                    );
                    break;
                }
            };
            page += 1;

            let Some(connection) = extract(data) else {
                tracing::debug!(page, "Pagination stopped: user or connection missing");
                break;
            };
            let (nodes, page_info) = connection.into_parts();
            if nodes.is_empty() {
                tracing::debug!(page, "Pagination stopped: empty page");
                break;
            }

            let (kept, reached_older) = filter_window(nodes, window);
            gathered.extend(kept);

            if reached_older {
                tracing::debug!(page, "Pagination stopped: reached window start");
                break;
            }
            if gathered.len() >= max_nodes {
                tracing::info!(page, max_nodes, "Pagination stopped: node cap reached");
                break;
            }

            match page_info {
                Some(info) if info.has_next_page && info.end_cursor.is_some() => {
                    cursor = info.end_cursor;
                }
                _ => {
                    tracing::debug!(page, "Pagination stopped: no further page");
                    break;
                }
            }
        }

        gathered.truncate(max_nodes);
        Ok(gathered)
    }
}

/// Keep the nodes inside `window`.
///
/// The flag reports whether any node predates the window start, which on a
/// newest-first connection means no later page can contain window nodes.
fn filter_window<N: Timestamped>(nodes: Vec<N>, window: &YearWindow) -> (Vec<N>, bool) {
    let mut reached_older = false;
    let kept = nodes
        .into_iter()
        .filter(|node| match node.timestamp() {
            Some(ts) if window.is_before_start(ts) => {
                reached_older = true;
                false
            }
            Some(ts) => window.contains(ts),
            None => false,
        })
        .collect();
    (kept, reached_older)
}

fn windowed_variables(login: &str, window: &YearWindow) -> serde_json::Value {
    json!({
        "login": login,
        "from": window.from_param(),
        "to": window.to_param(),
    })
}

fn user_not_found(login: &str) -> Error {
    Error::GitHub(format!("user not found: {}", login))
}

/// Degrade an optional source to an empty list.
fn or_empty<T>(source: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch {}: {}", source, e);
        Vec::new()
    })
}

/// Parse a raw GraphQL body; used by tests to drive the response shapes.
#[cfg(test)]
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: responses::GraphQlResponse<T> = serde_json::from_str(body)?;
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(created_at: &str) -> PullRequestEvent {
        PullRequestEvent {
            created_at: Some(created_at.to_string()),
            merged: false,
            merged_at: None,
        }
    }

    #[test]
    fn test_filter_window_keeps_in_window_nodes() {
        let window = YearWindow::new(2025).unwrap();
        let nodes = vec![pr("2025-12-01T10:00:00Z"), pr("2025-01-01T00:00:00Z")];

        let (kept, reached_older) = filter_window(nodes, &window);

        assert_eq!(kept.len(), 2);
        assert!(!reached_older);
    }

    #[test]
    fn test_filter_window_stops_at_older_nodes() {
        let window = YearWindow::new(2025).unwrap();
        let nodes = vec![pr("2025-02-01T10:00:00Z"), pr("2024-12-31T23:00:00Z")];

        let (kept, reached_older) = filter_window(nodes, &window);

        assert_eq!(kept, vec![pr("2025-02-01T10:00:00Z")]);
        assert!(reached_older);
    }

    #[test]
    fn test_filter_window_skips_newer_and_undated_nodes() {
        let window = YearWindow::new(2024).unwrap();
        let undated = PullRequestEvent::default();
        let nodes = vec![pr("2025-03-01T00:00:00Z"), undated, pr("2024-06-01T00:00:00Z")];

        let (kept, reached_older) = filter_window(nodes, &window);

        assert_eq!(kept, vec![pr("2024-06-01T00:00:00Z")]);
        assert!(!reached_older);
    }

    #[test]
    fn test_windowed_variables() {
        let window = YearWindow::new(2025).unwrap();
        let vars = windowed_variables("octocat", &window);
        assert_eq!(vars["login"], "octocat");
        assert_eq!(vars["from"], "2025-01-01T00:00:00+00:00");
        assert_eq!(vars["to"], "2025-12-31T23:59:59+00:00");
    }

    #[test]
    fn test_collector_requires_token() {
        let config = GitHubConfig {
            token: None,
            ..Default::default()
        };
        // An explicit empty override must not fall through to a real token.
        let result = Collector::new(&config, Some(""));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_collector_with_token_override() {
        assert!(Collector::new(&GitHubConfig::default(), Some("ghp_test")).is_ok());
    }

    #[test]
    fn test_or_empty_degrades_errors() {
        crate::logging::init_test();
        let failed: Result<Vec<u32>> = Err(Error::Http("boom".to_string()));
        assert!(or_empty("test", failed).is_empty());
        assert_eq!(or_empty("test", Ok(vec![1, 2])), vec![1, 2]);
    }

    #[test]
    fn test_pull_request_page_extraction() {
        let body = r#"{"data": {"user": {"pullRequests": {
            "pageInfo": {"hasNextPage": true, "endCursor": "Y3Vyc29y"},
            "nodes": [
                {"createdAt": "2025-05-01T09:00:00Z", "merged": true, "mergedAt": "2025-05-02T09:00:00Z"},
                null
            ]
        }}}}"#;
        let data: PullRequestsData = parse_body(body).unwrap();
        let (nodes, page_info) = data.user.and_then(|u| u.pull_requests).unwrap().into_parts();

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].merged);
        let info = page_info.unwrap();
        assert!(info.has_next_page);
        assert_eq!(info.end_cursor.as_deref(), Some("Y3Vyc29y"));
    }

    #[test]
    fn test_unknown_user_is_an_error() {
        let body = r#"{"data": {"user": null}, "errors": [{"message": "Could not resolve to a User with the login of 'nobody'."}]}"#;
        let result: Result<CalendarData> = parse_body(body);
        assert!(matches!(result, Err(Error::GitHub(_))));
    }

    #[test]
    fn test_collect_step_descriptions() {
        assert_eq!(
            CollectStep::Calendar.description(),
            "Fetching contribution calendar"
        );
        assert!(CollectStep::Collaboration.description().contains("reviews"));
    }
}
