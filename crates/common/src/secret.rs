//! Secret wrapper for sensitive values

use std::fmt;
use zeroize::Zeroize;

/// Sensitive string value - redacted in Debug/Display/logs, zeroized on drop.
///
/// Holds the OAuth client secret. Access and refresh tokens are deliberately
/// NOT wrapped — callers persist those between runs, so they round-trip
/// through serde as plain strings.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value (use sparingly)
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_debug_and_display() {
        let secret = Secret::new("client-secret-value");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn exposes_inner_value() {
        let secret = Secret::new("client-secret-value");
        assert_eq!(secret.expose(), "client-secret-value");
    }

    #[test]
    fn replacing_a_secret_keeps_the_new_value() {
        let mut secret = Secret::new("old");
        secret = Secret::from("new");
        assert_eq!(secret.expose(), "new");
    }

    #[test]
    fn clone_is_independent() {
        let secret = Secret::from(String::from("value"));
        let copy = secret.clone();
        drop(secret);
        assert_eq!(copy.expose(), "value");
    }
}
