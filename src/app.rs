//! Application state management for octoterm.
//!
//! This module contains the core `App` struct that manages all application
//! state: UI state, the authenticated session, fetched GitHub data, the
//! input forms behind the mutating operations, and background task
//! coordination.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use zeroize::Zeroize;

use crate::api::{ApiError, Session};
use crate::auth::Credential;
use crate::config::Config;
use crate::models::{
    AccountProfile, CreateGistRequest, CreateIssueRequest, CreateRepoRequest, Gist, Issue,
    IssueState, NewGistFile, NotificationThread, Repository, Workflow,
};
use crate::utils::contains_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces at most a handful of messages; 32 leaves
/// plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for login form fields.
const MAX_FIELD_LENGTH: usize = 200;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Repos,
    Gists,
    Issues,
    Workflows,
    Inbox,
    Account,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Repos => "Repos",
            Tab::Gists => "Gists",
            Tab::Issues => "Issues",
            Tab::Workflows => "Workflows",
            Tab::Inbox => "Inbox",
            Tab::Account => "Account",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Repos => Tab::Gists,
            Tab::Gists => Tab::Issues,
            Tab::Issues => Tab::Workflows,
            Tab::Workflows => Tab::Inbox,
            Tab::Inbox => Tab::Account,
            Tab::Account => Tab::Repos,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Repos => Tab::Account,
            Tab::Gists => Tab::Repos,
            Tab::Issues => Tab::Gists,
            Tab::Workflows => Tab::Issues,
            Tab::Inbox => Tab::Workflows,
            Tab::Account => Tab::Inbox,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    Prompting,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Token,
    Button,
}

// ============================================================================
// Input Forms
// ============================================================================

/// The mutating operation an open form will perform on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    CreateRepo,
    DeleteRepo { name: String },
    UploadFile { repo: String },
    DownloadFile { repo: String },
    CreateGist,
    CreateIssue { repo: String },
    DispatchWorkflow { repo: String, workflow_id: i64 },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Yes/no fields accept only a y/n toggle
    pub boolean: bool,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            boolean: false,
        }
    }

    fn text_with(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            boolean: false,
        }
    }

    fn flag(label: &'static str) -> Self {
        Self {
            label,
            value: "no".to_string(),
            boolean: true,
        }
    }

    pub fn is_yes(&self) -> bool {
        self.value == "yes"
    }

    pub fn toggle(&mut self) {
        self.value = if self.is_yes() { "no" } else { "yes" }.to_string();
    }
}

/// A generic field-sequence form rendered as an overlay.
/// Generalization of the login form for the mutating operations.
#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub action: PendingAction,
}

impl Form {
    pub fn focused_field_mut(&mut self) -> &mut FormField {
        let focus = self.focus.min(self.fields.len().saturating_sub(1));
        &mut self.fields[focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks.
///
/// Variants are sent through an MPSC channel from spawned fetch/action
/// tasks back to the main application loop.
enum TaskOutcome {
    Repos(Vec<Repository>),
    Gists(Vec<Gist>),
    Notifications(Vec<NotificationThread>),
    Account(Box<AccountProfile>),
    /// Issues for a repository (repo name, issues)
    Issues(String, Vec<Issue>),
    /// Workflows for a repository (repo name, workflows)
    Workflows(String, Vec<Workflow>),
    /// A mutating operation finished; message for the status bar
    ActionDone(String),
    /// Session was invalidated by a 401 mid-flight
    SessionInvalid,
    Error(String),
    RefreshComplete,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Option<Arc<Session>>,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,

    // Login form state
    pub login_username: String,
    pub login_token: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Input form overlay
    pub form: Option<Form>,

    // Selection indices (into the filtered lists)
    pub repo_selection: usize,
    pub gist_selection: usize,
    pub issue_selection: usize,
    pub workflow_selection: usize,
    pub inbox_selection: usize,

    // Fetched data
    pub repos: Vec<Repository>,
    pub gists: Vec<Gist>,
    pub issues: Vec<Issue>,
    pub workflows: Vec<Workflow>,
    pub notifications: Vec<NotificationThread>,
    pub account: Option<AccountProfile>,

    /// Repository the Issues/Workflows tabs operate on
    pub active_repo: Option<String>,
    pub issue_state: IssueState,

    // Background task channel
    task_rx: mpsc::Receiver<TaskOutcome>,
    task_tx: mpsc::Sender<TaskOutcome>,

    // Status message
    pub status_message: Option<String>,
    pub refreshing: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = config.last_username.clone().unwrap_or_default();

        Ok(Self {
            config,
            session: None,

            state: AppState::Normal,
            current_tab: Tab::Repos,
            focus: Focus::List,
            search_query: String::new(),

            login_username,
            login_token: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,

            form: None,

            repo_selection: 0,
            gist_selection: 0,
            issue_selection: 0,
            workflow_selection: 0,
            inbox_selection: 0,

            repos: Vec::new(),
            gists: Vec::new(),
            issues: Vec::new(),
            workflows: Vec::new(),
            notifications: Vec::new(),
            account: None,

            active_repo: None,
            issue_state: IssueState::Open,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
            refreshing: false,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| !s.is_invalid())
            .unwrap_or(false)
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Token
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let credential =
            match Credential::acquire_static(self.login_username.clone(), self.login_token.clone())
            {
                Ok(c) => c,
                Err(e) => {
                    self.login_error = Some(e.to_string());
                    return Err(e.into());
                }
            };

        // The form copy of the token is no longer needed once the
        // credential owns it.
        self.login_token.zeroize();
        self.login_token.clear();

        self.login_error = None;
        self.login_with_credential(credential).await
    }

    /// Verify a credential against the API and adopt the session.
    ///
    /// Shared by the login form, the interactive prompt, and
    /// environment-supplied credentials.
    pub async fn login_with_credential(&mut self, credential: Credential) -> Result<()> {
        let session = Session::new(credential)?;

        match session.get_user().await {
            Ok(profile) => {
                info!(login = %profile.login, "Login successful");
                self.login_username = profile.login.clone();

                self.config.last_username = Some(profile.login.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.account = Some(profile);
                self.session = Some(Arc::new(session));
                self.state = AppState::Normal;
                self.refresh_all_background();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(friendly_error(&e));
                self.state = AppState::LoggingIn;
                Err(e.into())
            }
        }
    }

    /// Drop the session and return to the login form. Called when a 401
    /// invalidates the session mid-run.
    fn handle_session_invalid(&mut self) {
        warn!("Session invalidated, credentials must be re-entered");
        self.session = None;
        self.status_message = Some("Session expired - please sign in again".to_string());
        self.start_login();
    }

    // =========================================================================
    // Filtered accessors
    // =========================================================================

    pub fn filtered_repos(&self) -> Vec<&Repository> {
        self.repos
            .iter()
            .filter(|r| {
                self.search_query.is_empty()
                    || contains_ignore_case(&r.full_name, &self.search_query)
            })
            .collect()
    }

    pub fn filtered_gists(&self) -> Vec<&Gist> {
        self.gists
            .iter()
            .filter(|g| {
                self.search_query.is_empty()
                    || contains_ignore_case(g.display_title(), &self.search_query)
            })
            .collect()
    }

    pub fn filtered_issues(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| {
                self.search_query.is_empty() || contains_ignore_case(&i.title, &self.search_query)
            })
            .collect()
    }

    pub fn filtered_notifications(&self) -> Vec<&NotificationThread> {
        self.notifications
            .iter()
            .filter(|n| {
                self.search_query.is_empty()
                    || contains_ignore_case(&n.subject.title, &self.search_query)
            })
            .collect()
    }

    pub fn selected_repo(&self) -> Option<&Repository> {
        self.filtered_repos().get(self.repo_selection).copied()
    }

    pub fn selected_workflow(&self) -> Option<&Workflow> {
        self.workflows.get(self.workflow_selection)
    }

    /// The repository name mutating/per-repo operations target: the
    /// explicitly activated repo, falling back to the list selection.
    pub fn context_repo(&self) -> Option<String> {
        self.active_repo
            .clone()
            .or_else(|| self.selected_repo().map(|r| r.name.clone()))
    }

    /// Clamp all selection indices after list contents changed.
    fn clamp_selections(&mut self) {
        self.repo_selection = self
            .repo_selection
            .min(self.filtered_repos().len().saturating_sub(1));
        self.gist_selection = self
            .gist_selection
            .min(self.filtered_gists().len().saturating_sub(1));
        self.issue_selection = self
            .issue_selection
            .min(self.filtered_issues().len().saturating_sub(1));
        self.workflow_selection = self
            .workflow_selection
            .min(self.workflows.len().saturating_sub(1));
        self.inbox_selection = self
            .inbox_selection
            .min(self.filtered_notifications().len().saturating_sub(1));
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh the account-level data
    /// (repos, gists, notifications, profile).
    pub fn refresh_all_background(&mut self) {
        let session = match &self.session {
            Some(s) => Arc::clone(s),
            None => {
                warn!("No session available for refresh");
                return;
            }
        };

        let tx = self.task_tx.clone();
        self.refreshing = true;
        self.status_message = Some("Refreshing...".to_string());

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, session).await;
        });

        // Per-repo data rides along when a context repo is set.
        if let Some(repo) = self.active_repo.clone() {
            self.load_repo_context(repo);
        }
    }

    async fn execute_background_refresh(tx: mpsc::Sender<TaskOutcome>, session: Arc<Session>) {
        info!("Background refresh started");

        let (repos, gists, notifications, account) = tokio::join!(
            session.list_repos(),
            session.list_gists(),
            session.list_notifications(),
            session.get_user(),
        );

        Self::send_fetch_result(&tx, &session, "repositories", repos, TaskOutcome::Repos).await;
        Self::send_fetch_result(&tx, &session, "gists", gists, TaskOutcome::Gists).await;
        Self::send_fetch_result(
            &tx,
            &session,
            "notifications",
            notifications,
            TaskOutcome::Notifications,
        )
        .await;
        Self::send_fetch_result(&tx, &session, "profile", account, |p| {
            TaskOutcome::Account(Box::new(p))
        })
        .await;

        info!("Background refresh complete");
        Self::send(&tx, TaskOutcome::RefreshComplete).await;
    }

    /// Spawn a fetch of the per-repository data (issues and workflows).
    pub fn load_repo_context(&mut self, repo: String) {
        let session = match &self.session {
            Some(s) => Arc::clone(s),
            None => return,
        };

        let tx = self.task_tx.clone();
        let state = self.issue_state;

        tokio::spawn(async move {
            let (issues, workflows) =
                tokio::join!(session.list_issues(&repo, state), session.list_workflows(&repo));

            match issues {
                Ok(list) => Self::send(&tx, TaskOutcome::Issues(repo.clone(), list)).await,
                Err(e) => Self::report_error(&tx, &session, "issues", e).await,
            }
            match workflows {
                Ok(list) => Self::send(&tx, TaskOutcome::Workflows(repo.clone(), list)).await,
                Err(e) => Self::report_error(&tx, &session, "workflows", e).await,
            }
        });
    }

    /// Cycle the issue state filter and refetch.
    pub fn cycle_issue_state(&mut self) {
        self.issue_state = self.issue_state.next();
        if let Some(repo) = self.active_repo.clone() {
            self.load_repo_context(repo);
        }
    }

    /// Mark the selected repository as the working context.
    pub fn activate_selected_repo(&mut self) {
        if let Some(repo) = self.selected_repo() {
            let name = repo.name.clone();
            self.status_message = Some(format!("Working on {}", name));
            self.active_repo = Some(name.clone());
            self.load_repo_context(name);
        }
    }

    /// Mark every notification thread as read.
    pub fn mark_inbox_read(&mut self) {
        let session = match &self.session {
            Some(s) => Arc::clone(s),
            None => return,
        };
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            match session.mark_notifications_read().await {
                Ok(()) => {
                    Self::send(&tx, TaskOutcome::ActionDone("Inbox marked read".to_string()))
                        .await;
                    match session.list_notifications().await {
                        Ok(list) => Self::send(&tx, TaskOutcome::Notifications(list)).await,
                        Err(e) => Self::report_error(&tx, &session, "notifications", e).await,
                    }
                }
                Err(e) => Self::report_error(&tx, &session, "mark read", e).await,
            }
        });
    }

    async fn send(tx: &mpsc::Sender<TaskOutcome>, outcome: TaskOutcome) {
        if tx.send(outcome).await.is_err() {
            error!("Failed to send task outcome - channel closed");
        }
    }

    async fn send_fetch_result<T>(
        tx: &mpsc::Sender<TaskOutcome>,
        session: &Session,
        what: &str,
        result: Result<T, ApiError>,
        wrap: impl FnOnce(T) -> TaskOutcome,
    ) {
        match result {
            Ok(value) => Self::send(tx, wrap(value)).await,
            Err(e) => Self::report_error(tx, session, what, e).await,
        }
    }

    async fn report_error(
        tx: &mpsc::Sender<TaskOutcome>,
        session: &Session,
        what: &str,
        err: ApiError,
    ) {
        warn!(what, error = %err, "Background task failed");
        if session.is_invalid() {
            Self::send(tx, TaskOutcome::SessionInvalid).await;
        } else {
            Self::send(tx, TaskOutcome::Error(format!("{}: {}", what, friendly_error(&err)))).await;
        }
    }

    /// Drain completed background tasks and fold them into app state.
    pub fn check_background_tasks(&mut self) {
        while let Ok(outcome) = self.task_rx.try_recv() {
            match outcome {
                TaskOutcome::Repos(repos) => self.repos = repos,
                TaskOutcome::Gists(gists) => self.gists = gists,
                TaskOutcome::Notifications(list) => self.notifications = list,
                TaskOutcome::Account(profile) => self.account = Some(*profile),
                TaskOutcome::Issues(repo, issues) => {
                    if self.active_repo.as_deref() == Some(repo.as_str()) {
                        self.issues = issues;
                    }
                }
                TaskOutcome::Workflows(repo, workflows) => {
                    if self.active_repo.as_deref() == Some(repo.as_str()) {
                        self.workflows = workflows;
                    }
                }
                TaskOutcome::ActionDone(message) => {
                    self.status_message = Some(message);
                }
                TaskOutcome::SessionInvalid => self.handle_session_invalid(),
                TaskOutcome::Error(message) => {
                    self.status_message = Some(message);
                }
                TaskOutcome::RefreshComplete => {
                    self.refreshing = false;
                    if self
                        .status_message
                        .as_deref()
                        .map(|m| m.starts_with("Refreshing"))
                        .unwrap_or(false)
                    {
                        self.status_message = None;
                    }
                }
            }
            self.clamp_selections();
        }
    }

    // =========================================================================
    // Forms for mutating operations
    // =========================================================================

    pub fn open_create_repo_form(&mut self) {
        self.form = Some(Form {
            title: "New repository".to_string(),
            fields: vec![
                FormField::text("Name"),
                FormField::text("Description"),
                FormField::flag("Private"),
                FormField::flag("Initialize with README"),
            ],
            focus: 0,
            error: None,
            action: PendingAction::CreateRepo,
        });
        self.state = AppState::Prompting;
    }

    pub fn open_delete_repo_form(&mut self) {
        let Some(repo) = self.selected_repo() else {
            return;
        };
        let name = repo.name.clone();
        self.form = Some(Form {
            title: format!("Delete {}", name),
            fields: vec![FormField::text("Type the repository name to confirm")],
            focus: 0,
            error: None,
            action: PendingAction::DeleteRepo { name },
        });
        self.state = AppState::Prompting;
    }

    pub fn open_upload_form(&mut self) {
        let Some(repo) = self.context_repo() else {
            self.status_message = Some("Select a repository first".to_string());
            return;
        };
        let branch = self.config.branch().to_string();
        self.form = Some(Form {
            title: format!("Upload file to {}", repo),
            fields: vec![
                FormField::text("Local file path"),
                FormField::text("Destination path in repo"),
                FormField::text("Commit message"),
                FormField::text_with("Branch", branch),
            ],
            focus: 0,
            error: None,
            action: PendingAction::UploadFile { repo },
        });
        self.state = AppState::Prompting;
    }

    pub fn open_download_form(&mut self) {
        let Some(repo) = self.context_repo() else {
            self.status_message = Some("Select a repository first".to_string());
            return;
        };
        self.form = Some(Form {
            title: format!("Download file from {}", repo),
            fields: vec![
                FormField::text("Path in repo"),
                FormField::text("Save as (blank: file name)"),
            ],
            focus: 0,
            error: None,
            action: PendingAction::DownloadFile { repo },
        });
        self.state = AppState::Prompting;
    }

    pub fn open_create_gist_form(&mut self) {
        self.form = Some(Form {
            title: "New gist".to_string(),
            fields: vec![
                FormField::text("Local file path"),
                FormField::text("Description"),
                FormField::flag("Public"),
            ],
            focus: 0,
            error: None,
            action: PendingAction::CreateGist,
        });
        self.state = AppState::Prompting;
    }

    pub fn open_create_issue_form(&mut self) {
        let Some(repo) = self.active_repo.clone() else {
            self.status_message = Some("Activate a repository first (Enter on Repos)".to_string());
            return;
        };
        self.form = Some(Form {
            title: format!("New issue in {}", repo),
            fields: vec![FormField::text("Title"), FormField::text("Body")],
            focus: 0,
            error: None,
            action: PendingAction::CreateIssue { repo },
        });
        self.state = AppState::Prompting;
    }

    pub fn open_dispatch_form(&mut self) {
        let Some(repo) = self.active_repo.clone() else {
            self.status_message = Some("Activate a repository first (Enter on Repos)".to_string());
            return;
        };
        let Some(workflow) = self.selected_workflow() else {
            return;
        };
        let branch = self.config.branch().to_string();
        self.form = Some(Form {
            title: format!("Run {}", workflow.name),
            fields: vec![FormField::text_with("Ref", branch)],
            focus: 0,
            error: None,
            action: PendingAction::DispatchWorkflow {
                repo,
                workflow_id: workflow.id,
            },
        });
        self.state = AppState::Prompting;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.state = AppState::Normal;
    }

    /// Validate the open form and spawn its operation.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let session = match &self.session {
            Some(s) => Arc::clone(s),
            None => return,
        };
        let tx = self.task_tx.clone();

        let value = |i: usize| -> String { form.fields[i].value.trim().to_string() };

        match form.action.clone() {
            PendingAction::CreateRepo => {
                let name = value(0);
                if name.is_empty() {
                    self.form_error("Name is required");
                    return;
                }
                let req = CreateRepoRequest {
                    name,
                    description: value(1),
                    private: form.fields[2].is_yes(),
                    auto_init: form.fields[3].is_yes(),
                };
                self.close_form();
                tokio::spawn(async move {
                    match session.create_repo(&req).await {
                        Ok(repo) => {
                            Self::send(
                                &tx,
                                TaskOutcome::ActionDone(format!("Created {}", repo.html_url)),
                            )
                            .await;
                            Self::refetch_repos(&tx, &session).await;
                        }
                        Err(e) => Self::report_error(&tx, &session, "create repo", e).await,
                    }
                });
            }
            PendingAction::DeleteRepo { name } => {
                if value(0) != name {
                    self.form_error("Name does not match");
                    return;
                }
                self.close_form();
                tokio::spawn(async move {
                    match session.delete_repo(&name).await {
                        Ok(()) => {
                            Self::send(&tx, TaskOutcome::ActionDone(format!("Deleted {}", name)))
                                .await;
                            Self::refetch_repos(&tx, &session).await;
                        }
                        Err(e) => Self::report_error(&tx, &session, "delete repo", e).await,
                    }
                });
            }
            PendingAction::UploadFile { repo } => {
                let local = value(0);
                let dest = value(1);
                if local.is_empty() || dest.is_empty() {
                    self.form_error("Local path and destination are required");
                    return;
                }
                let message = if value(2).is_empty() {
                    format!("Upload {}", dest)
                } else {
                    value(2)
                };
                let branch = if value(3).is_empty() {
                    self.config.branch().to_string()
                } else {
                    value(3)
                };
                self.close_form();
                tokio::spawn(async move {
                    let bytes = match std::fs::read(&local) {
                        Ok(b) => b,
                        Err(e) => {
                            Self::send(&tx, TaskOutcome::Error(format!("Read {}: {}", local, e)))
                                .await;
                            return;
                        }
                    };
                    match session
                        .upload_file(&repo, &dest, &message, &branch, &bytes)
                        .await
                    {
                        Ok(response) => {
                            let location = response
                                .content
                                .and_then(|c| c.html_url)
                                .unwrap_or_else(|| dest.clone());
                            Self::send(
                                &tx,
                                TaskOutcome::ActionDone(format!("Uploaded {}", location)),
                            )
                            .await;
                        }
                        Err(e) => Self::report_error(&tx, &session, "upload", e).await,
                    }
                });
            }
            PendingAction::DownloadFile { repo } => {
                let path = value(0);
                if path.is_empty() {
                    self.form_error("Path is required");
                    return;
                }
                let save_as = value(1);
                self.close_form();
                tokio::spawn(async move {
                    match session.download_file(&repo, &path).await {
                        Ok((file, bytes)) => {
                            let target = if save_as.is_empty() {
                                PathBuf::from(&file.name)
                            } else {
                                PathBuf::from(save_as)
                            };
                            match std::fs::write(&target, bytes) {
                                Ok(()) => {
                                    Self::send(
                                        &tx,
                                        TaskOutcome::ActionDone(format!(
                                            "Saved to {}",
                                            target.display()
                                        )),
                                    )
                                    .await
                                }
                                Err(e) => {
                                    Self::send(
                                        &tx,
                                        TaskOutcome::Error(format!(
                                            "Write {}: {}",
                                            target.display(),
                                            e
                                        )),
                                    )
                                    .await
                                }
                            }
                        }
                        Err(e) => Self::report_error(&tx, &session, "download", e).await,
                    }
                });
            }
            PendingAction::CreateGist => {
                let local = value(0);
                if local.is_empty() {
                    self.form_error("File path is required");
                    return;
                }
                let description = value(1);
                let public = form.fields[2].is_yes();
                self.close_form();
                tokio::spawn(async move {
                    let content = match std::fs::read_to_string(&local) {
                        Ok(c) => c,
                        Err(e) => {
                            Self::send(&tx, TaskOutcome::Error(format!("Read {}: {}", local, e)))
                                .await;
                            return;
                        }
                    };
                    let filename = PathBuf::from(&local)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "file.txt".to_string());
                    let mut files = std::collections::BTreeMap::new();
                    files.insert(filename, NewGistFile { content });
                    let req = CreateGistRequest {
                        description,
                        public,
                        files,
                    };
                    match session.create_gist(&req).await {
                        Ok(gist) => {
                            Self::send(
                                &tx,
                                TaskOutcome::ActionDone(format!("Created {}", gist.html_url)),
                            )
                            .await;
                            match session.list_gists().await {
                                Ok(list) => Self::send(&tx, TaskOutcome::Gists(list)).await,
                                Err(e) => Self::report_error(&tx, &session, "gists", e).await,
                            }
                        }
                        Err(e) => Self::report_error(&tx, &session, "create gist", e).await,
                    }
                });
            }
            PendingAction::CreateIssue { repo } => {
                let title = value(0);
                if title.is_empty() {
                    self.form_error("Title is required");
                    return;
                }
                let req = CreateIssueRequest {
                    title,
                    body: value(1),
                };
                let state = self.issue_state;
                self.close_form();
                tokio::spawn(async move {
                    match session.create_issue(&repo, &req).await {
                        Ok(issue) => {
                            Self::send(
                                &tx,
                                TaskOutcome::ActionDone(format!(
                                    "Created issue #{}",
                                    issue.number
                                )),
                            )
                            .await;
                            match session.list_issues(&repo, state).await {
                                Ok(list) => {
                                    Self::send(&tx, TaskOutcome::Issues(repo.clone(), list)).await
                                }
                                Err(e) => Self::report_error(&tx, &session, "issues", e).await,
                            }
                        }
                        Err(e) => Self::report_error(&tx, &session, "create issue", e).await,
                    }
                });
            }
            PendingAction::DispatchWorkflow { repo, workflow_id } => {
                let git_ref = value(0);
                if git_ref.is_empty() {
                    self.form_error("Ref is required");
                    return;
                }
                self.close_form();
                tokio::spawn(async move {
                    match session.dispatch_workflow(&repo, workflow_id, &git_ref).await {
                        Ok(()) => {
                            Self::send(
                                &tx,
                                TaskOutcome::ActionDone(format!("Workflow run queued on {}", git_ref)),
                            )
                            .await
                        }
                        Err(e) => Self::report_error(&tx, &session, "dispatch", e).await,
                    }
                });
            }
        }
    }

    async fn refetch_repos(tx: &mpsc::Sender<TaskOutcome>, session: &Arc<Session>) {
        match session.list_repos().await {
            Ok(list) => Self::send(tx, TaskOutcome::Repos(list)).await,
            Err(e) => Self::report_error(tx, session, "repositories", e).await,
        }
    }

    fn form_error(&mut self, message: &str) {
        if let Some(form) = &mut self.form {
            form.error = Some(message.to_string());
        }
    }

    // =========================================================================
    // Login form editing
    // =========================================================================

    pub fn login_push_char(&mut self, c: char) {
        let field = match self.login_focus {
            LoginFocus::Username => &mut self.login_username,
            LoginFocus::Token => &mut self.login_token,
            LoginFocus::Button => return,
        };
        if field.len() < MAX_FIELD_LENGTH {
            field.push(c);
        }
    }

    pub fn login_pop_char(&mut self) {
        match self.login_focus {
            LoginFocus::Username => {
                self.login_username.pop();
            }
            LoginFocus::Token => {
                self.login_token.pop();
            }
            LoginFocus::Button => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // The login form buffer may still hold a typed token when the
        // operator quits from the overlay.
        self.login_token.zeroize();
    }
}

/// Map an API error to a short operator-facing message.
///
/// Never includes the token; `ApiError` display impls cannot carry it.
pub fn friendly_error(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Invalid username or token".to_string(),
        ApiError::RateLimited { retry_after } => match retry_after {
            Some(d) => format!("Rate limited - retry in {}s", d.as_secs()),
            None => "Rate limited - try again shortly".to_string(),
        },
        ApiError::Network(_) => "Unable to reach GitHub. Check your connection.".to_string(),
        ApiError::Remote { status, .. } => format!("GitHub error (HTTP {})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Repos.next(), Tab::Gists);
        assert_eq!(Tab::Account.next(), Tab::Repos);
        assert_eq!(Tab::Repos.prev(), Tab::Account);
    }

    #[test]
    fn test_form_field_toggle() {
        let mut field = FormField::flag("Private");
        assert!(!field.is_yes());
        field.toggle();
        assert!(field.is_yes());
        field.toggle();
        assert!(!field.is_yes());
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut form = Form {
            title: "t".to_string(),
            fields: vec![FormField::text("a"), FormField::text("b")],
            focus: 1,
            error: None,
            action: PendingAction::CreateRepo,
        };
        form.next_field();
        assert_eq!(form.focus, 0);
        form.prev_field();
        assert_eq!(form.focus, 1);
    }

    #[test]
    fn test_friendly_error_excludes_details_for_auth() {
        let msg = friendly_error(&ApiError::Unauthorized);
        assert_eq!(msg, "Invalid username or token");
    }
}
