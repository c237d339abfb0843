// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Gist {
    pub id: String,
    pub description: Option<String>,
    pub public: bool,
    pub html_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Gist {
    /// Display text: the description when set, otherwise the first
    /// filename.
    pub fn display_title(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => self
                .files
                .keys()
                .next()
                .map(String::as_str)
                .unwrap_or("(empty gist)"),
        }
    }

    pub fn visibility_label(&self) -> &'static str {
        if self.public {
            "public"
        } else {
            "secret"
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    pub filename: Option<String>,
    #[serde(default)]
    pub size: i64,
    pub language: Option<String>,
}

/// Body for `POST /gists`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGistRequest {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, NewGistFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGistFile {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_falls_back_to_filename() {
        let json = r#"{
            "id": "aa11",
            "description": "",
            "public": true,
            "html_url": "https://gist.github.com/aa11",
            "files": {
                "snippet.rs": {"filename": "snippet.rs", "size": 120, "language": "Rust"}
            },
            "created_at": "2026-02-01T10:00:00Z"
        }"#;

        let gist: Gist = serde_json::from_str(json).unwrap();
        assert_eq!(gist.display_title(), "snippet.rs");
        assert_eq!(gist.visibility_label(), "public");
    }
}
