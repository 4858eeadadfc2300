//! Response shapes for the GitHub GraphQL queries
//!
//! Leaf nodes reuse the [`crate::types`] records wherever the API shape
//! already matches; only the wrappers and the few nodes that need
//! reshaping (reviews, created repositories) are defined here.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{
    CommentEvent, ContributionCalendar, CreatedRepo, IssueEvent, PullRequestEvent,
    RepoContribution, RepoLanguages, ReviewEvent,
};

/// Standard GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Data, or `Error::GitHub` carrying every reported error message.
    pub fn into_result(self) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(Error::GitHub(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| Error::GitHub("response contained no data".to_string()))
    }
}

// ============================================
// Wrappers
// ============================================

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct Viewer {
    pub login: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData<T> {
    pub contributions_collection: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Option<Vec<Option<T>>>,
}

impl<T> Nodes<T> {
    /// Non-null nodes, in response order.
    pub fn into_nodes(self) -> Vec<T> {
        self.nodes.unwrap_or_default().into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of a cursor-paginated connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: Option<PageInfo>,
    pub nodes: Option<Vec<Option<T>>>,
}

impl<T> Connection<T> {
    /// Non-null nodes plus the page info needed to continue.
    pub fn into_parts(self) -> (Vec<T>, Option<PageInfo>) {
        let nodes = self.nodes.unwrap_or_default().into_iter().flatten().collect();
        (nodes, self.page_info)
    }
}

// ============================================
// Per-query payloads
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarField {
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByRepoField {
    #[serde(default)]
    pub commit_contributions_by_repository: Option<Vec<RepoContribution>>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoriesField<C> {
    pub repositories: Option<C>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsField {
    pub pull_requests: Option<Connection<PullRequestEvent>>,
}

#[derive(Debug, Deserialize)]
pub struct IssuesField {
    pub issues: Option<Connection<IssueEvent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCommentsField {
    pub issue_comments: Option<Connection<CommentEvent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsField {
    pub pull_request_review_contributions: Option<Nodes<ReviewContributionNode>>,
}

pub type CalendarData = UserData<CollectionData<CalendarField>>;
pub type ByRepoData = UserData<CollectionData<ByRepoField>>;
pub type LanguagesData = UserData<RepositoriesField<Nodes<RepoLanguages>>>;
pub type PullRequestsData = UserData<PullRequestsField>;
pub type ReviewsData = UserData<CollectionData<ReviewsField>>;
pub type IssuesData = UserData<IssuesField>;
pub type IssueCommentsData = UserData<IssueCommentsField>;
pub type CreatedReposData = UserData<RepositoriesField<Connection<CreatedRepoNode>>>;

// ============================================
// Nodes that need reshaping
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewContributionNode {
    pub occurred_at: Option<String>,
    pub pull_request_review: Option<ReviewState>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewState {
    pub state: Option<String>,
}

impl From<ReviewContributionNode> for ReviewEvent {
    fn from(node: ReviewContributionNode) -> Self {
        ReviewEvent {
            submitted_at: node.occurred_at,
            state: node.pull_request_review.and_then(|r| r.state),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRepoNode {
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
pub struct BranchRef {
    pub target: Option<BranchTarget>,
}

#[derive(Debug, Deserialize)]
pub struct BranchTarget {
    pub history: Option<CommitHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHistory {
    #[serde(default)]
    pub total_count: u64,
}

impl CreatedRepoNode {
    /// Commits on the default branch; 0 for empty repositories.
    pub fn commit_count(&self) -> u64 {
        self.default_branch_ref
            .as_ref()
            .and_then(|b| b.target.as_ref())
            .and_then(|t| t.history.as_ref())
            .map(|h| h.total_count)
            .unwrap_or(0)
    }
}

impl From<CreatedRepoNode> for CreatedRepo {
    fn from(node: CreatedRepoNode) -> Self {
        let commit_count = node.commit_count();
        CreatedRepo {
            name: node.name.unwrap_or_default(),
            created_at: node.created_at,
            commit_count,
        }
    }
}

// ============================================
// Timestamps used to stop pagination
// ============================================

/// A paginated node with a creation timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> Option<&str>;
}

impl Timestamped for PullRequestEvent {
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Timestamped for IssueEvent {
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Timestamped for CommentEvent {
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Timestamped for CreatedRepoNode {
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_take_precedence() {
        let json = r#"{"data": null, "errors": [{"message": "Bad credentials"}, {"message": "x"}]}"#;
        let resp: GraphQlResponse<ViewerData> = serde_json::from_str(json).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "GitHub error: Bad credentials; x");
    }

    #[test]
    fn test_viewer_response() {
        let json = r#"{"data": {"viewer": {"id": "U_1", "login": "octocat", "name": null}}}"#;
        let resp: GraphQlResponse<ViewerData> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap().viewer.login, "octocat");
    }

    #[test]
    fn test_calendar_response_reuses_raw_types() {
        let json = r#"{"data": {"user": {"contributionsCollection": {"contributionCalendar": {
            "totalContributions": 5,
            "weeks": [{"contributionDays": [{"date": "2025-01-01", "contributionCount": 5}]}]
        }}}}}"#;
        let resp: GraphQlResponse<CalendarData> = serde_json::from_str(json).unwrap();
        let calendar = resp
            .into_result()
            .unwrap()
            .user
            .and_then(|u| u.contributions_collection)
            .and_then(|c| c.contribution_calendar)
            .unwrap();
        assert_eq!(calendar.total_contributions, 5);
        assert_eq!(calendar.days().next().unwrap().date, "2025-01-01");
    }

    #[test]
    fn test_created_repo_commit_count() {
        let json = r#"{"data": {"user": {"repositories": {
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "nodes": [
                {"name": "full", "createdAt": "2025-02-01T00:00:00Z",
                 "defaultBranchRef": {"target": {"history": {"totalCount": 12}}}},
                {"name": "empty", "createdAt": "2025-03-01T00:00:00Z", "defaultBranchRef": null}
            ]
        }}}}"#;
        let resp: GraphQlResponse<CreatedReposData> = serde_json::from_str(json).unwrap();
        let conn = resp
            .into_result()
            .unwrap()
            .user
            .and_then(|u| u.repositories)
            .unwrap();
        let (nodes, page_info) = conn.into_parts();
        assert!(!page_info.unwrap().has_next_page);
        let repos: Vec<CreatedRepo> = nodes.into_iter().map(Into::into).collect();
        assert_eq!(repos[0].commit_count, 12);
        assert_eq!(repos[1].commit_count, 0);
        assert_eq!(repos[1].name, "empty");
    }

    #[test]
    fn test_review_node_mapping() {
        let node = ReviewContributionNode {
            occurred_at: Some("2025-04-01T08:00:00Z".to_string()),
            pull_request_review: Some(ReviewState {
                state: Some("APPROVED".to_string()),
            }),
        };
        let review = ReviewEvent::from(node);
        assert_eq!(review.submitted_at.as_deref(), Some("2025-04-01T08:00:00Z"));
        assert_eq!(review.state.as_deref(), Some("APPROVED"));
    }
}
