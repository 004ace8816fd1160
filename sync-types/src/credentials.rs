//! Account credentials for the remote source.

use std::fmt;

/// Server address and login for one account.
///
/// The values are opaque secrets; they are only checked for presence.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the remote service.
    pub server_url: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Name of the first missing field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.server_url.trim().is_empty() {
            Some("server_url")
        } else if self.username.trim().is_empty() {
            Some("username")
        } else if self.password.is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("https://school.example", "parent", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("parent"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn missing_field_reports_first_gap() {
        assert_eq!(Credentials::new("", "u", "p").missing_field(), Some("server_url"));
        assert_eq!(Credentials::new("s", " ", "p").missing_field(), Some("username"));
        assert_eq!(Credentials::new("s", "u", "").missing_field(), Some("password"));
        assert_eq!(Credentials::new("s", "u", "p").missing_field(), None);
    }
}
