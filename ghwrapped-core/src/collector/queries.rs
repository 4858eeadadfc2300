//! GraphQL documents sent to the GitHub API.

pub const VIEWER_QUERY: &str = r#"
query Viewer {
  viewer {
    id
    login
    name
  }
}
"#;

pub const CALENDAR_QUERY: &str = r#"
query ContributionsCalendar($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}
"#;

pub const REPO_CONTRIB_QUERY: &str = r#"
query ContributionsByRepo($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      commitContributionsByRepository {
        repository {
          name
          owner { login }
        }
        contributions {
          totalCount
        }
      }
    }
  }
}
"#;

pub const LANGUAGES_QUERY: &str = r#"
query RepositoriesLanguages($login: String!) {
  user(login: $login) {
    repositories(
      first: 100
      ownerAffiliations: OWNER
      isFork: false
      orderBy: { field: UPDATED_AT, direction: DESC }
    ) {
      nodes {
        name
        languages(first: 10, orderBy: { field: SIZE, direction: DESC }) {
          edges {
            node { name }
            size
          }
        }
      }
    }
  }
}
"#;

pub const PRS_QUERY: &str = r#"
query PullRequests($login: String!, $cursor: String) {
  user(login: $login) {
    pullRequests(first: 50, after: $cursor, orderBy: { field: CREATED_AT, direction: DESC }) {
      pageInfo { hasNextPage endCursor }
      nodes { createdAt merged mergedAt }
    }
  }
}
"#;

pub const REVIEWS_QUERY: &str = r#"
query PullRequestReviews($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      pullRequestReviewContributions(first: 100) {
        nodes {
          occurredAt
          pullRequestReview { state }
        }
      }
    }
  }
}
"#;

pub const ISSUES_QUERY: &str = r#"
query Issues($login: String!, $cursor: String) {
  user(login: $login) {
    issues(first: 50, after: $cursor, orderBy: { field: CREATED_AT, direction: DESC }) {
      pageInfo { hasNextPage endCursor }
      nodes { createdAt closedAt }
    }
  }
}
"#;

// Issue comments only order by UPDATED_AT. An edited old comment can end
// pagination slightly early; that is accepted.
pub const COMMENTS_QUERY: &str = r#"
query IssueComments($login: String!, $cursor: String) {
  user(login: $login) {
    issueComments(first: 50, after: $cursor, orderBy: { field: UPDATED_AT, direction: DESC }) {
      pageInfo { hasNextPage endCursor }
      nodes { createdAt }
    }
  }
}
"#;

pub const CREATED_REPOS_QUERY: &str = r#"
query CreatedRepos($login: String!, $cursor: String) {
  user(login: $login) {
    repositories(first: 50, after: $cursor, orderBy: { field: CREATED_AT, direction: DESC }) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        createdAt
        defaultBranchRef {
          target {
            ... on Commit {
              history(first: 1) {
                totalCount
              }
            }
          }
        }
      }
    }
  }
}
"#;
