//! Authorization redirect URL construction
//!
//! Builds the URL the end user's browser is sent to when no authorization
//! material exists. The `state` parameter is an opaque anti-forgery value
//! the client supplies; the authorization server returns it unchanged in
//! the redirect callback so the caller can reject forged callbacks.

use rand::RngExt;

use crate::provider::Provider;
use crate::session::Session;

/// Build the full authorization URL from the session's identity fields.
///
/// Parameter order is fixed: `client_id`, `response_type`, `redirect_uri`,
/// `state`.
pub fn authorization_url(provider: &Provider, session: &Session) -> String {
    format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&state={}",
        provider.authorize_url(),
        session.client_id(),
        urlencoded(session.redirect_uri()),
        session.state(),
    )
}

/// Generate a random URL-safe anti-forgery state value for callers that
/// don't bring their own.
pub fn generate_state() -> String {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[(b & 0x3f) as usize] as char)
        .collect()
}

/// Minimal URL encoding for parameter values.
/// Only encodes characters that would break URL parameter parsing.
fn urlencoded(s: &str) -> String {
    s.replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
}
