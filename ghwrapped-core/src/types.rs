//! Raw event types supplied by the collector
//!
//! [`RawEvents`] is the single aggregate record handed to the profile engine.
//! Its JSON shape mirrors the GitHub GraphQL payloads it is assembled from
//! (camelCase keys inside, `byRepo` / `created_repos` at the top level), so a
//! snapshot written with `--save-raw` can be fed back with `--input`.
//!
//! ## Defaults
//!
//! Every field is optional. A missing key, an explicit `null` and a value of
//! the wrong type all collapse to the neutral default (`0`, `""`, `false`,
//! empty list), and `null` or malformed elements inside lists are dropped. Timestamps stay as the raw
//! strings the API returned; the engine skips the ones it cannot parse.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::Result;

/// Treat `null`, or a value of the wrong type, the same as a missing field.
fn default_on_invalid<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a list, dropping `null` and malformed elements. Anything
/// other than an array is an empty list.
fn skip_invalid<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

// ============================================
// Aggregate record
// ============================================

/// Everything the collector gathered for one user and one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvents {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub calendar: ContributionCalendar,

    /// Commit contributions per repository, busiest first.
    #[serde(rename = "byRepo", default, deserialize_with = "skip_invalid")]
    pub by_repo: Vec<RepoContribution>,

    /// Language breakdown per owned repository.
    #[serde(default, deserialize_with = "skip_invalid")]
    pub languages: Vec<RepoLanguages>,

    #[serde(default, deserialize_with = "default_on_invalid")]
    pub collaboration: Collaboration,

    /// Repositories created in the window with at least one commit.
    #[serde(default, deserialize_with = "skip_invalid")]
    pub created_repos: Vec<CreatedRepo>,
}

impl RawEvents {
    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

// ============================================
// Contribution calendar
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    /// Total as reported by GitHub; may cover more than the listed days.
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub total_contributions: u64,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub weeks: Vec<ContributionWeek>,
}

impl ContributionCalendar {
    /// All days of all weeks, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flat_map(|week| week.contribution_days.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub contribution_days: Vec<ContributionDay>,
}

/// One calendar day. `date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub contribution_count: u64,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub date: String,
}

// ============================================
// Repositories
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoContribution {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub repository: RepositoryRef,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub contributions: ContributionCount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRef {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub name: String,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub owner: Owner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCount {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub total_count: u64,
}

/// Language sizes (bytes) for one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoLanguages {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub name: String,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub languages: LanguageConnection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageConnection {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEdge {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub node: LanguageNode,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageNode {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRepo {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "default_on_invalid",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    /// Commits on the default branch at collection time
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub commit_count: u64,
}

// ============================================
// Collaboration
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collaboration {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub prs: Vec<PullRequestEvent>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub reviews: Vec<ReviewEvent>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub issues: Vec<IssueEvent>,
    #[serde(default, deserialize_with = "skip_invalid")]
    pub comments: Vec<CommentEvent>,
}

impl Collaboration {
    /// Every collaboration timestamp that is present, PRs first, then
    /// reviews, issues and comments. Values are unparsed.
    pub fn timestamps(&self) -> impl Iterator<Item = &str> {
        let prs = self.prs.iter().filter_map(|p| p.created_at.as_deref());
        let reviews = self.reviews.iter().filter_map(|r| r.submitted_at.as_deref());
        let issues = self.issues.iter().filter_map(|i| i.created_at.as_deref());
        let comments = self.comments.iter().filter_map(|c| c.created_at.as_deref());
        prs.chain(reviews).chain(issues).chain(comments)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestEvent {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub merged: bool,
    #[serde(
        default,
        deserialize_with = "default_on_invalid",
        skip_serializing_if = "Option::is_none"
    )]
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub submitted_at: Option<String>,
    /// APPROVED, CHANGES_REQUESTED, COMMENTED, ...
    #[serde(
        default,
        deserialize_with = "default_on_invalid",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueEvent {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub created_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "default_on_invalid",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEvent {
    #[serde(default, deserialize_with = "default_on_invalid")]
    pub created_at: Option<String>,
}
