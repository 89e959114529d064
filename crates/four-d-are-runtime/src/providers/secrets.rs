//! Secure credential handling for the completion endpoint.
//!
//! - Credentials never appear in `Debug`/`Display` output
//! - The value is zeroed on drop (via `secrecy`)
//! - Exposure is explicit: call [`ApiCredential::expose`] at the point of use

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Expose the credential value for use in a request header.
    ///
    /// Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().trim().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl Clone for ApiCredential {
    fn clone(&self) -> Self {
        Self::new(self.expose(), self.source, self.name)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk-super-secret-key-12345";

    #[test]
    fn test_credential_redacted_in_debug() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Test API key");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains(SECRET), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_redacted_in_display() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Environment, "Test API key");
        let display = format!("{}", cred);
        assert!(!display.contains(SECRET), "Secret exposed in Display!");
        assert_eq!(display, "Test API key from environment [REDACTED]");
    }

    #[test]
    fn test_credential_expose_and_clone() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Programmatic, "Test API key");
        let copy = cred.clone();
        assert_eq!(copy.expose(), SECRET);
        assert_eq!(copy.source(), CredentialSource::Programmatic);
    }

    #[test]
    fn test_blank_credential_is_empty() {
        let cred = ApiCredential::new("  ", CredentialSource::Programmatic, "Test API key");
        assert!(cred.is_empty());
    }
}
