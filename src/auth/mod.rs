//! Credential acquisition and in-memory secret handling.
//!
//! This module provides:
//! - `Credential`: an owned username/token pair for GitHub authentication
//! - `Secret`: a wrapper that zeroizes the token on drop and redacts it
//!   from all debug output
//!
//! Credentials live only in process memory. Nothing in this module (or the
//! rest of the crate) writes the token to disk, to the environment, or to
//! a log sink.

pub mod credentials;

pub use credentials::{Credential, CredentialError, Secret};
