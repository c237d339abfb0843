use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State filter for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_query(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }

    /// Cycle to the next filter (open -> closed -> all -> open).
    pub fn next(&self) -> Self {
        match self {
            IssueState::Open => IssueState::Closed,
            IssueState::Closed => IssueState::All,
            IssueState::All => IssueState::Open,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub body: Option<String>,
    pub html_url: String,
    pub user: Option<IssueAuthor>,
    #[serde(default)]
    pub comments: i64,
    pub created_at: Option<DateTime<Utc>>,
    /// Present when the entry is actually a pull request; the issues
    /// endpoint returns both and callers filter on this field.
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("-")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueAuthor {
    pub login: String,
}

/// Body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_requests_are_flagged() {
        let json = r#"[
            {
                "number": 12,
                "title": "Real issue",
                "state": "open",
                "body": null,
                "html_url": "https://github.com/alice/r/issues/12",
                "user": {"login": "bob"},
                "comments": 2,
                "created_at": "2026-03-01T00:00:00Z"
            },
            {
                "number": 13,
                "title": "A PR in disguise",
                "state": "open",
                "body": null,
                "html_url": "https://github.com/alice/r/pull/13",
                "user": {"login": "carol"},
                "comments": 0,
                "created_at": "2026-03-02T00:00:00Z",
                "pull_request": {"url": "https://api.github.com/repos/alice/r/pulls/13"}
            }
        ]"#;

        let issues: Vec<Issue> = serde_json::from_str(json).unwrap();
        assert!(!issues[0].is_pull_request());
        assert!(issues[1].is_pull_request());
        assert_eq!(issues[0].author(), "bob");
    }

    #[test]
    fn test_state_filter_cycle() {
        assert_eq!(IssueState::Open.next(), IssueState::Closed);
        assert_eq!(IssueState::All.next(), IssueState::Open);
        assert_eq!(IssueState::Closed.as_query(), "closed");
    }
}
