//! Authenticated request pipeline for the Bullhorn REST API
//!
//! Issues GET/POST calls against the tenant base URL obtained during the
//! REST login, attaching the session token header and normalizing
//! success and error responses. Responses are generic JSON values — no
//! endpoint-specific typing lives at this layer. No retries either: every
//! failure propagates once, and the caller owns the decision to
//! re-connect or give up.

pub mod client;

pub use client::RestClient;

/// Errors from authenticated REST calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 4xx from the REST API, carrying the provider's `errorMessage`.
    #[error("upstream request failed ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport failure, malformed response, or unexpected status.
    #[error("API error: {0}")]
    Api(String),

    /// The session has not completed the REST login yet.
    #[error("session has no REST credentials: {0}")]
    SessionIncomplete(String),
}

/// Result alias for REST operations.
pub type Result<T> = std::result::Result<T, Error>;
