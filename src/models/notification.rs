// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A thread from `GET /notifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationThread {
    pub id: String,
    pub reason: String,
    #[serde(default)]
    pub unread: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub subject: NotificationSubject,
    pub repository: Option<NotificationRepository>,
}

impl NotificationThread {
    pub fn repo_name(&self) -> &str {
        self.repository
            .as_ref()
            .map(|r| r.full_name.as_str())
            .unwrap_or("-")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSubject {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRepository {
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification_thread() {
        let json = r#"{
            "id": "9001",
            "reason": "mention",
            "unread": true,
            "updated_at": "2026-04-05T16:00:00Z",
            "subject": {"title": "Please review", "type": "PullRequest"},
            "repository": {"full_name": "alice/octoterm"}
        }"#;

        let thread: NotificationThread = serde_json::from_str(json).unwrap();
        assert!(thread.unread);
        assert_eq!(thread.repo_name(), "alice/octoterm");
        assert_eq!(thread.subject.kind, "PullRequest");
    }
}
