use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub open_issues_count: i64,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn visibility_label(&self) -> &'static str {
        if self.private {
            "private"
        } else {
            "public"
        }
    }

    pub fn formatted_updated(&self) -> String {
        match self.updated_at {
            Some(ts) => format_date(&ts.to_rfc3339()),
            None => "-".to_string(),
        }
    }

    /// Owner half of `full_name` ("owner/repo").
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(&self.full_name)
    }
}

/// Body for `POST /user/repos`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    pub private: bool,
    pub description: String,
    /// When true GitHub seeds the repository with an initial commit and
    /// a README, which also makes the default branch exist immediately.
    pub auto_init: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository() {
        let json = r#"{
            "name": "octoterm",
            "full_name": "alice/octoterm",
            "private": false,
            "description": "terminal things",
            "html_url": "https://github.com/alice/octoterm",
            "default_branch": "main",
            "stargazers_count": 7,
            "forks_count": 1,
            "open_issues_count": 3,
            "language": "Rust",
            "updated_at": "2026-01-12T08:30:00Z"
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.owner(), "alice");
        assert_eq!(repo.visibility_label(), "public");
        assert_eq!(repo.stargazers_count, 7);
    }

    #[test]
    fn test_parse_repository_with_missing_counts() {
        let json = r#"{
            "name": "bare",
            "full_name": "alice/bare",
            "private": true,
            "description": null,
            "html_url": "https://github.com/alice/bare",
            "default_branch": null,
            "language": null,
            "updated_at": null
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.visibility_label(), "private");
        assert_eq!(repo.stargazers_count, 0);
        assert_eq!(repo.formatted_updated(), "-");
    }
}
