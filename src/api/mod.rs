//! REST API client module for GitHub.
//!
//! This module provides:
//! - `GhClient`: the HTTP transport with GitHub's required headers
//! - `Session`: the authenticated context that owns the credential and
//!   exposes one typed method per supported account operation
//! - `ApiError`: the error taxonomy for remote calls
//!
//! Authentication uses a personal access token attached as an
//! `Authorization` header on every request.

pub mod client;
pub mod error;
pub mod session;

pub use client::GhClient;
pub use error::ApiError;
pub use session::{Session, SessionState};
