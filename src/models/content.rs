// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A file entry from `GET /repos/{owner}/{repo}/contents/{path}`.
///
/// For file responses GitHub includes the blob content base64-encoded
/// with embedded newlines.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: i64,
    pub content: Option<String>,
    pub encoding: Option<String>,
    pub html_url: Option<String>,
}

impl ContentFile {
    /// Decode the embedded blob.
    ///
    /// Returns `None` when the response carried no content (directories,
    /// oversized files) or the encoding is not base64.
    pub fn decoded(&self) -> Option<Vec<u8>> {
        let content = self.content.as_deref()?;
        if self.encoding.as_deref().unwrap_or("base64") != "base64" {
            return None;
        }
        let stripped: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64.decode(stripped).ok()
    }
}

/// Body for `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64 of the new blob.
    pub content: String,
    pub branch: String,
    /// Required by GitHub when replacing an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl PutContentRequest {
    pub fn new(message: String, bytes: &[u8], branch: String, sha: Option<String>) -> Self {
        Self {
            message,
            content: BASE64.encode(bytes),
            branch,
            sha,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutContentResponse {
    pub content: Option<PutContentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutContentEntry {
    pub path: String,
    pub sha: String,
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_base64() {
        let file = ContentFile {
            name: "README.md".to_string(),
            path: "README.md".to_string(),
            sha: "abc123".to_string(),
            size: 11,
            // GitHub wraps base64 at 60 columns with newlines
            content: Some("aGVsbG8g\nd29ybGQ=\n".to_string()),
            encoding: Some("base64".to_string()),
            html_url: None,
        };

        assert_eq!(file.decoded().unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_absent_content() {
        let file = ContentFile {
            name: "big.bin".to_string(),
            path: "big.bin".to_string(),
            sha: "def456".to_string(),
            size: 104857600,
            content: None,
            encoding: Some("none".to_string()),
            html_url: None,
        };

        assert!(file.decoded().is_none());
    }

    #[test]
    fn test_put_request_omits_sha_for_new_files() {
        let req = PutContentRequest::new(
            "Add notes".to_string(),
            b"notes",
            "main".to_string(),
            None,
        );
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], BASE64.encode(b"notes"));
    }
}
