//! Data models for the GitHub entities octoterm operates on.
//!
//! This module contains the serde types for the subset of the REST API
//! surface the application uses:
//!
//! - `Repository`: repository listings and creation
//! - `ContentFile`: the contents API (file upload/download)
//! - `Gist`, `GistFile`: gist listings and creation
//! - `Issue`: issue listings and creation
//! - `Workflow`: Actions workflows and dispatches
//! - `NotificationThread`: the notification inbox
//! - `AccountProfile`: the authenticated user
//!
//! All of these are transient request/response values; none are persisted.

pub mod account;
pub mod content;
pub mod gist;
pub mod issue;
pub mod notification;
pub mod repo;
pub mod workflow;

pub use account::AccountProfile;
pub use content::{ContentFile, PutContentRequest, PutContentResponse};
pub use gist::{CreateGistRequest, Gist, GistFile, NewGistFile};
pub use issue::{CreateIssueRequest, Issue, IssueState};
pub use notification::NotificationThread;
pub use repo::{CreateRepoRequest, Repository};
pub use workflow::{Workflow, WorkflowDispatchRequest, WorkflowList};
