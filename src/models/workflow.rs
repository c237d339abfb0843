// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Response wrapper for `GET /repos/{owner}/{repo}/actions/workflows`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowList {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub path: String,
}

impl Workflow {
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Body for `POST .../actions/workflows/{id}/dispatches`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDispatchRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workflow_list() {
        let json = r#"{
            "total_count": 2,
            "workflows": [
                {"id": 101, "name": "CI", "state": "active", "path": ".github/workflows/ci.yml"},
                {"id": 102, "name": "Release", "state": "disabled_manually", "path": ".github/workflows/release.yml"}
            ]
        }"#;

        let list: WorkflowList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total_count, 2);
        assert!(list.workflows[0].is_active());
        assert!(!list.workflows[1].is_active());
    }

    #[test]
    fn test_dispatch_request_uses_ref_key() {
        let req = WorkflowDispatchRequest {
            git_ref: "main".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ref"], "main");
    }
}
