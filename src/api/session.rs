//! The authenticated session.
//!
//! A `Session` owns the credential for the lifetime of the process run
//! and exposes one typed method per supported account operation. Every
//! request goes through [`Session::send`], which attaches the token,
//! applies the retry policy, and drives the state machine:
//!
//! - `Unauthenticated` until the first completed exchange
//! - `Authenticated` after any non-401 response
//! - `Invalid` after a 401; further calls fail fast with `Unauthorized`
//!   without touching the network, until a new session is built from
//!   fresh credentials
//!
//! Only idempotent requests (GET/HEAD) are retried, and only on
//! transport failures. Mutating requests are never retried automatically,
//! so a flaky network cannot create a repository or an issue twice.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::Credential;
use crate::models::{
    AccountProfile, ContentFile, CreateGistRequest, CreateIssueRequest, CreateRepoRequest,
    Gist, Issue, IssueState, NotificationThread, PutContentRequest, PutContentResponse,
    Repository, Workflow, WorkflowDispatchRequest, WorkflowList,
};

use super::{ApiError, GhClient};

/// Delay before the single idempotent retry.
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Unauthenticated = 0,
    Authenticated = 1,
    Invalid = 2,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Authenticated,
            2 => SessionState::Invalid,
            _ => SessionState::Unauthenticated,
        }
    }
}

/// The in-memory authenticated context for one process run.
///
/// Shared read-only across background tasks via `Arc`; the only mutable
/// cell is the atomic state flag, so no lock is held across awaits and
/// the held credential is never mutated in place.
pub struct Session {
    client: GhClient,
    credential: Credential,
    state: AtomicU8,
}

impl Session {
    /// Create a session against the production API.
    pub fn new(credential: Credential) -> Result<Self, ApiError> {
        Ok(Self::with_client(GhClient::new()?, credential))
    }

    /// Create a session over an existing transport (tests, enterprise
    /// endpoints).
    pub fn with_client(client: GhClient, credential: Credential) -> Self {
        Self {
            client,
            credential,
            state: AtomicU8::new(SessionState::Unauthenticated as u8),
        }
    }

    pub fn username(&self) -> &str {
        &self.credential.username
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// True whenever a 401 has been seen; callers should discard the
    /// session and re-acquire credentials.
    pub fn is_invalid(&self) -> bool {
        self.state() == SessionState::Invalid
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Requests safe to repeat without changing the outcome.
    fn is_idempotent(method: &Method) -> bool {
        *method == Method::GET || *method == Method::HEAD
    }

    async fn dispatch_with_retry<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let retryable = Self::is_idempotent(&method);

        match self
            .client
            .dispatch(method.clone(), path, self.credential.token(), body)
            .await
        {
            Err(err) if err.is_network() && retryable => {
                warn!(%method, path, error = %err, "Transport failure, retrying once");
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                self.client
                    .dispatch(method, path, self.credential.token(), body)
                    .await
            }
            other => other,
        }
    }

    /// Record the outcome of an exchange in the state machine.
    fn observe(&self, result: &Result<reqwest::Response, ApiError>) {
        match result {
            // Any completed exchange that is not a 401 proves the
            // credential is live.
            Ok(_) | Err(ApiError::RateLimited { .. }) | Err(ApiError::Remote { .. }) => {
                let _ = self.state.compare_exchange(
                    SessionState::Unauthenticated as u8,
                    SessionState::Authenticated as u8,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                );
            }
            Err(ApiError::Unauthorized) => {
                self.state
                    .store(SessionState::Invalid as u8, Ordering::SeqCst);
            }
            // Transport failures say nothing about the credential.
            Err(ApiError::Network(_)) => {}
        }
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        if self.is_invalid() {
            debug!(path, "Session invalid, failing fast");
            return Err(ApiError::Unauthorized);
        }

        let result = self.dispatch_with_retry(method, path, body).await;
        self.observe(&result);
        result
    }

    /// Perform an authenticated call and parse the JSON response.
    pub async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let response = self.exchange(method, path, body).await?;
        Ok(response.json().await?)
    }

    /// Perform an authenticated call whose response body is irrelevant
    /// (204/205 endpoints).
    pub async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        self.exchange(method, path, body).await?;
        Ok(())
    }

    /// GET and parse, with no request body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Fetch the authenticated user. Doubles as credential verification
    /// right after login.
    pub async fn get_user(&self) -> Result<AccountProfile, ApiError> {
        self.get("/user").await
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub async fn list_repos(&self) -> Result<Vec<Repository>, ApiError> {
        self.get("/user/repos?per_page=100&sort=updated").await
    }

    pub async fn create_repo(&self, req: &CreateRepoRequest) -> Result<Repository, ApiError> {
        self.send(Method::POST, "/user/repos", Some(req)).await
    }

    pub async fn delete_repo(&self, name: &str) -> Result<(), ApiError> {
        let path = format!("/repos/{}/{}", self.username(), name);
        self.send_unit(Method::DELETE, &path, None::<&()>).await
    }

    // =========================================================================
    // Contents
    // =========================================================================

    /// Fetch a file entry, mapping 404 to `None` so callers can
    /// distinguish "new file" from a real failure.
    pub async fn get_content(
        &self,
        repo: &str,
        path: &str,
    ) -> Result<Option<ContentFile>, ApiError> {
        let url = format!("/repos/{}/{}/contents/{}", self.username(), repo, path);
        match self.get(&url).await {
            Ok(file) => Ok(Some(file)),
            Err(ApiError::Remote { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create or replace a file in a repository.
    ///
    /// Looks up the existing blob first: GitHub requires the previous
    /// sha when replacing, and rejects the write without it.
    pub async fn upload_file(
        &self,
        repo: &str,
        dest: &str,
        message: &str,
        branch: &str,
        bytes: &[u8],
    ) -> Result<PutContentResponse, ApiError> {
        let existing = self.get_content(repo, dest).await?;
        let sha = existing.map(|f| f.sha);

        let req = PutContentRequest::new(message.to_string(), bytes, branch.to_string(), sha);
        let url = format!("/repos/{}/{}/contents/{}", self.username(), repo, dest);
        self.send(Method::PUT, &url, Some(&req)).await
    }

    /// Download a file, returning the entry and its decoded bytes.
    pub async fn download_file(
        &self,
        repo: &str,
        path: &str,
    ) -> Result<(ContentFile, Vec<u8>), ApiError> {
        let url = format!("/repos/{}/{}/contents/{}", self.username(), repo, path);
        let file: ContentFile = self.get(&url).await?;
        let bytes = file.decoded().ok_or_else(|| ApiError::Remote {
            status: 200,
            message: format!("{} has no inline content to download", file.path),
        })?;
        Ok((file, bytes))
    }

    // =========================================================================
    // Workflows
    // =========================================================================

    pub async fn list_workflows(&self, repo: &str) -> Result<Vec<Workflow>, ApiError> {
        let path = format!("/repos/{}/{}/actions/workflows", self.username(), repo);
        let list: WorkflowList = self.get(&path).await?;
        Ok(list.workflows)
    }

    pub async fn dispatch_workflow(
        &self,
        repo: &str,
        workflow_id: i64,
        git_ref: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/repos/{}/{}/actions/workflows/{}/dispatches",
            self.username(),
            repo,
            workflow_id
        );
        let req = WorkflowDispatchRequest {
            git_ref: git_ref.to_string(),
        };
        self.send_unit(Method::POST, &path, Some(&req)).await
    }

    // =========================================================================
    // Gists
    // =========================================================================

    pub async fn list_gists(&self) -> Result<Vec<Gist>, ApiError> {
        self.get("/gists").await
    }

    pub async fn create_gist(&self, req: &CreateGistRequest) -> Result<Gist, ApiError> {
        self.send(Method::POST, "/gists", Some(req)).await
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn list_notifications(&self) -> Result<Vec<NotificationThread>, ApiError> {
        self.get("/notifications").await
    }

    pub async fn mark_notifications_read(&self) -> Result<(), ApiError> {
        self.send_unit(Method::PUT, "/notifications", None::<&()>)
            .await
    }

    // =========================================================================
    // Issues
    // =========================================================================

    /// List issues, with pull requests filtered out (the endpoint
    /// returns both).
    pub async fn list_issues(&self, repo: &str, state: IssueState) -> Result<Vec<Issue>, ApiError> {
        let path = format!(
            "/repos/{}/{}/issues?state={}&per_page=100",
            self.username(),
            repo,
            state.as_query()
        );
        let issues: Vec<Issue> = self.get(&path).await?;
        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    pub async fn create_issue(
        &self,
        repo: &str,
        req: &CreateIssueRequest,
    ) -> Result<Issue, ApiError> {
        let path = format!("/repos/{}/{}/issues", self.username(), repo);
        self.send(Method::POST, &path, Some(req)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use mockito::Server;

    fn test_session(base_url: &str) -> Session {
        let credential = Credential::acquire_static("alice", "ghp_example").unwrap();
        let client = GhClient::with_base_url(base_url).unwrap();
        Session::with_client(client, credential)
    }

    #[tokio::test]
    async fn test_login_verification_authenticates_session() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "token ghp_example")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"login": "alice", "public_repos": 1}"#)
            .create_async()
            .await;

        let session = test_session(&server.url());
        assert_eq!(session.state(), SessionState::Unauthenticated);

        let profile = session.get_user().await.unwrap();
        assert_eq!(profile.login, "alice");
        assert_eq!(session.state(), SessionState::Authenticated);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_and_fails_fast() {
        let mut server = Server::new_async().await;
        // Exactly one request may reach the server.
        let mock = server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = test_session(&server.url());

        let first = session.get_user().await.unwrap_err();
        assert!(matches!(first, ApiError::Unauthorized));
        assert_eq!(session.state(), SessionState::Invalid);

        // Second call must not hit the network.
        let second = session.get_user().await.unwrap_err();
        assert!(matches!(second, ApiError::Unauthorized));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_retry_after() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/gists")
            .with_status(429)
            .with_header("retry-after", "30")
            .create_async()
            .await;

        let session = test_session(&server.url());
        let err = session.list_gists().await.unwrap_err();
        match err {
            ApiError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        // A throttled response still proves the token was accepted.
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_network_failure_on_idempotent_call() {
        // Nothing listens here; both the call and its one retry fail at
        // the transport.
        let session = test_session("http://127.0.0.1:9");
        let err = session.get_user().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_retry_policy_spares_mutating_methods() {
        assert!(Session::is_idempotent(&Method::GET));
        assert!(Session::is_idempotent(&Method::HEAD));
        assert!(!Session::is_idempotent(&Method::POST));
        assert!(!Session::is_idempotent(&Method::PUT));
        assert!(!Session::is_idempotent(&Method::DELETE));
        assert!(!Session::is_idempotent(&Method::PATCH));
    }

    #[tokio::test]
    async fn test_upload_file_sends_sha_when_replacing() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/contents/README.md")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "README.md", "path": "README.md", "sha": "oldsha", "size": 5}"#,
            )
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/repos/alice/notes/contents/README.md")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"sha": "oldsha", "branch": "main"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": {"path": "README.md", "sha": "newsha"}}"#)
            .create_async()
            .await;

        let session = test_session(&server.url());
        let response = session
            .upload_file("notes", "README.md", "Update README.md", "main", b"hello")
            .await
            .unwrap();

        assert_eq!(response.content.unwrap().sha, "newsha");
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_file_omits_sha_for_new_file() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/contents/new.txt")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        // Sha omission for new files is covered by the PutContentRequest
        // unit test; here we only check the write goes through.
        let put = server
            .mock("PUT", "/repos/alice/notes/contents/new.txt")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"branch": "main", "message": "Add new.txt"}"#.to_string(),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": {"path": "new.txt", "sha": "freshsha"}}"#)
            .create_async()
            .await;

        let session = test_session(&server.url());
        session
            .upload_file("notes", "new.txt", "Add new.txt", "main", b"data")
            .await
            .unwrap();

        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_issues_filters_pull_requests() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/octoterm/issues")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"number": 1, "title": "bug", "state": "open",
                     "html_url": "https://github.com/alice/octoterm/issues/1"},
                    {"number": 2, "title": "pr", "state": "open",
                     "html_url": "https://github.com/alice/octoterm/pull/2",
                     "pull_request": {"url": "x"}}
                ]"#,
            )
            .create_async()
            .await;

        let session = test_session(&server.url());
        let issues = session
            .list_issues("octoterm", IssueState::Open)
            .await
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 1);
    }
}
