use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use zeroize::Zeroize;

/// Environment variable holding the account username.
const ENV_USERNAME: &str = "OCTOTERM_USERNAME";

/// Environment variable holding the personal access token.
const ENV_TOKEN: &str = "OCTOTERM_TOKEN";

/// Placeholder printed wherever the token would otherwise appear.
const REDACTED: &str = "[redacted]";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Input aborted")]
    InputAborted,

    #[error("Username and token are both required")]
    MissingCredential,
}

/// A personal access token held in process memory.
///
/// The backing buffer is zeroized when the value is dropped, on every exit
/// path (normal return, `?` propagation, unwind). `Debug` and `Display`
/// print a redaction marker, never the token itself, and there is no
/// `Serialize` impl.
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw token. Callers may only place it in an
    /// `Authorization` header; it must not reach any log or file.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// An owned username/token pair.
///
/// Moved by value from acquisition into the session, so exactly one copy
/// of the token exists and its lifetime ends with the session.
#[derive(Debug)]
pub struct Credential {
    pub username: String,
    token: Secret,
}

impl Credential {
    /// Build a credential from pre-supplied values.
    ///
    /// Fails with `MissingCredential` if either field is empty after
    /// trimming.
    pub fn acquire_static(
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let username = username.into().trim().to_string();
        let mut raw: String = token.into();
        let trimmed = raw.trim().to_string();
        raw.zeroize();

        if username.is_empty() || trimmed.is_empty() {
            let mut trimmed = trimmed;
            trimmed.zeroize();
            return Err(CredentialError::MissingCredential);
        }

        Ok(Self {
            username,
            token: Secret::new(trimmed),
        })
    }

    /// Prompt the operator for a username and token.
    ///
    /// The token is read with terminal echo disabled. EOF or an
    /// interrupted read maps to `InputAborted`.
    pub fn acquire_interactive() -> Result<Self, CredentialError> {
        let username = Self::prompt_username().map_err(|_| CredentialError::InputAborted)?;
        let token =
            rpassword::prompt_password("Token: ").map_err(|_| CredentialError::InputAborted)?;
        Self::acquire_static(username, token)
    }

    /// Build a credential from the environment.
    ///
    /// Returns `Ok(None)` when neither variable is set. A partially set
    /// environment (one variable without the other) is `MissingCredential`.
    pub fn from_env() -> Result<Option<Self>, CredentialError> {
        let username = std::env::var(ENV_USERNAME).ok();
        let token = std::env::var(ENV_TOKEN).ok();

        match (username, token) {
            (None, None) => Ok(None),
            (username, token) => Self::acquire_static(
                username.unwrap_or_default(),
                token.unwrap_or_default(),
            )
            .map(Some),
        }
    }

    /// Borrow the held token.
    pub fn token(&self) -> &Secret {
        &self.token
    }

    fn prompt_username() -> io::Result<String> {
        print!("Username: ");
        io::stdout().flush()?;

        let mut username = String::new();
        let read = io::stdin().lock().read_line(&mut username)?;
        if read == 0 {
            // EOF before any input
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(username.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_static_rejects_empty_fields() {
        assert_eq!(
            Credential::acquire_static("", "x").unwrap_err(),
            CredentialError::MissingCredential
        );
        assert_eq!(
            Credential::acquire_static("x", "").unwrap_err(),
            CredentialError::MissingCredential
        );
        assert_eq!(
            Credential::acquire_static("  ", "ghp_example").unwrap_err(),
            CredentialError::MissingCredential
        );
    }

    #[test]
    fn test_acquire_static_trims_input() {
        let cred = Credential::acquire_static(" alice ", " ghp_example\n").unwrap();
        assert_eq!(cred.username, "alice");
        assert_eq!(cred.token().expose(), "ghp_example");
    }

    #[test]
    fn test_secret_never_appears_in_debug_output() {
        let cred = Credential::acquire_static("alice", "ghp_supersecret").unwrap();
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("ghp_supersecret"));
        assert!(debug.contains("alice"));

        let display = format!("{}", cred.token());
        assert_eq!(display, "[redacted]");
    }

    #[test]
    fn test_from_env_requires_both_variables() {
        // The OCTOTERM_* variables are touched by this test alone.
        std::env::remove_var(ENV_USERNAME);
        std::env::remove_var(ENV_TOKEN);
        assert!(Credential::from_env().unwrap().is_none());

        std::env::set_var(ENV_USERNAME, "alice");
        assert_eq!(
            Credential::from_env().unwrap_err(),
            CredentialError::MissingCredential
        );
        std::env::remove_var(ENV_USERNAME);
    }
}
