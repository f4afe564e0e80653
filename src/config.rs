//! Credential handling for the Coredata API client.
//!
//! The API authenticates every request with HTTP basic auth. [`Credentials`]
//! wraps the username/secret pair so the secret cannot leak through `Debug`
//! output or logs.

use std::fmt;

/// A username/secret pair for HTTP basic authentication.
///
/// The pair is opaque to the client: it is stored at construction and passed
/// through unmodified on every request. The `Debug` implementation masks the
/// secret.
///
/// # Example
///
/// ```rust
/// use coredata_api::Credentials;
///
/// let creds = Credentials::new("alice", "hunter2");
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(format!("{creds:?}"), "Credentials { username: \"alice\", secret: **** }");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &format_args!("****"))
            .finish()
    }
}
