//! Error types for authorization and token acquisition

/// Errors from authorization and token acquisition.
///
/// A required browser redirect is not an error — `connect()` reports it as
/// [`Connection::RedirectRequired`](crate::client::Connection). Nothing
/// here is retried or classified transient/permanent; every failure is
/// reported once and the caller decides what to do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The authorization server rejected a code or refresh-token exchange.
    #[error("could not acquire access token ({status}): {message}")]
    AcquireAccessToken { status: u16, message: String },

    /// The login endpoint rejected the REST session exchange.
    #[error("could not acquire REST token ({status}): {message}")]
    AcquireRestToken { status: u16, message: String },

    /// Transport failure, malformed response, or unexpected status.
    #[error("API error: {message}")]
    Api { status: Option<u16>, message: String },

    /// Invalid provider or client configuration.
    #[error(transparent)]
    Config(#[from] common::Error),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_provider_status_and_message() {
        let err = Error::AcquireAccessToken {
            status: 400,
            message: "invalid_grant - Invalid, expired, or revoked authorization code".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not acquire access token (400): \
             invalid_grant - Invalid, expired, or revoked authorization code"
        );

        let err = Error::AcquireRestToken {
            status: 401,
            message: "invalid_token - Access token expired".into(),
        };
        assert!(err.to_string().starts_with("could not acquire REST token (401):"));
    }

    #[test]
    fn config_errors_pass_through_common() {
        let err: Error = common::Error::Config("bad endpoint".into()).into();
        assert_eq!(err.to_string(), "configuration error: bad endpoint");
    }
}
