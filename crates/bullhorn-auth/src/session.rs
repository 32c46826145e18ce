//! Session state for one authenticated client context
//!
//! `Session` carries the caller's OAuth client identity and the token
//! artifacts the flows produce: the authorization code from the redirect
//! callback, the OAuth access/refresh pair with its absolute expiry, and
//! (two-stage deployments) the REST session token with its tenant base URL.
//!
//! Token fields are opaque strings. Nothing here validates their format —
//! the remote service accepting or rejecting them is the only test of
//! validity. A field counts as absent when it is `None` or empty; values
//! persisted by callers may round-trip through formats that turn one into
//! the other.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use common::Secret;

use crate::constants::EXPIRY_MARGIN_SECS;

/// Current unix time in seconds.
pub(crate) fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn is_absent(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Mutable authentication state for one client instance.
///
/// Created with only the identity fields populated; the token fields fill
/// in as the lifecycle advances (authorization → OAuth token → REST login),
/// or all at once via [`restore_tokens`](Self::restore_tokens) when the
/// caller rehydrates a persisted session.
#[derive(Debug, Clone)]
pub struct Session {
    client_id: String,
    client_secret: Secret,
    redirect_uri: String,
    state: String,
    authorization_code: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_expires_at: Option<u64>,
    rest_token: Option<String>,
    rest_url: Option<String>,
}

impl Session {
    /// Create a session holding only the caller's identity.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
            redirect_uri: redirect_uri.into(),
            state: state.into(),
            authorization_code: None,
            access_token: None,
            refresh_token: None,
            token_expires_at: None,
            rest_token: None,
            rest_url: None,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.client_id = client_id.into();
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose()
    }

    pub fn set_client_secret(&mut self, client_secret: impl Into<String>) {
        self.client_secret = Secret::new(client_secret);
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) {
        self.redirect_uri = redirect_uri.into();
    }

    /// Anti-forgery state echoed back by the authorization server.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    /// Authorization code captured from the redirect callback.
    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    pub fn set_authorization_code(&mut self, code: Option<String>) {
        self.authorization_code = code;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn set_refresh_token(&mut self, token: Option<String>) {
        self.refresh_token = token;
    }

    /// Absolute access-token expiry as a unix timestamp in seconds.
    pub fn token_expires_at(&self) -> Option<u64> {
        self.token_expires_at
    }

    pub fn set_token_expires_at(&mut self, expires_at: Option<u64>) {
        self.token_expires_at = expires_at;
    }

    /// REST session token (`BhRestToken`); only meaningful together with
    /// [`rest_url`](Self::rest_url).
    pub fn rest_token(&self) -> Option<&str> {
        self.rest_token.as_deref()
    }

    pub fn set_rest_token(&mut self, token: Option<String>) {
        self.rest_token = token;
    }

    /// Tenant REST base URL returned by the login exchange.
    pub fn rest_url(&self) -> Option<&str> {
        self.rest_url.as_deref()
    }

    pub fn set_rest_url(&mut self, url: Option<String>) {
        self.rest_url = url;
    }

    /// True when the stored expiry, minus the safety margin, has passed.
    /// A missing expiry counts as expired.
    pub fn token_has_expired(&self) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at.saturating_sub(EXPIRY_MARGIN_SECS) < now_unix(),
            None => true,
        }
    }

    /// True when an OAuth token exchange must run before the session can
    /// make authenticated calls.
    pub fn should_refresh_token(&self) -> bool {
        is_absent(&self.access_token) || self.token_has_expired()
    }

    /// True when the REST leg is incomplete. The session token and base URL
    /// are only valid in conjunction, so either one missing voids both.
    pub fn needs_rest_login(&self) -> bool {
        is_absent(&self.rest_token) || is_absent(&self.rest_url)
    }

    /// True when neither an authorization code nor a refresh token exists,
    /// i.e. nothing short of a new browser redirect can produce a token.
    pub fn lacks_authorization(&self) -> bool {
        is_absent(&self.authorization_code) && is_absent(&self.refresh_token)
    }

    /// Apply a successful OAuth token exchange: both tokens overwritten,
    /// expiry recomputed from the server-reported lifetime.
    pub(crate) fn apply_token_response(
        &mut self,
        access_token: String,
        refresh_token: String,
        expires_in: u64,
    ) {
        self.access_token = Some(access_token);
        self.refresh_token = Some(refresh_token);
        self.token_expires_at = Some(now_unix() + expires_in);
    }

    /// Apply a successful REST login. Both fields are written together so
    /// the session never holds a token without its base URL.
    pub(crate) fn apply_rest_login(&mut self, rest_token: String, rest_url: String) {
        self.rest_token = Some(rest_token);
        self.rest_url = Some(rest_url);
    }

    /// Snapshot the mutable token fields for persistence.
    pub fn token_set(&self) -> TokenSet {
        TokenSet {
            authorization_code: self.authorization_code.clone(),
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            token_expires_at: self.token_expires_at,
            rest_token: self.rest_token.clone(),
            rest_url: self.rest_url.clone(),
        }
    }

    /// Rehydrate the token fields from a persisted snapshot.
    pub fn restore_tokens(&mut self, tokens: TokenSet) {
        self.authorization_code = tokens.authorization_code;
        self.access_token = tokens.access_token;
        self.refresh_token = tokens.refresh_token;
        self.token_expires_at = tokens.token_expires_at;
        self.rest_token = tokens.rest_token;
        self.rest_url = tokens.rest_url;
    }
}

/// Persistable snapshot of a session's token fields.
///
/// Identity fields are deliberately excluded: the caller supplies those at
/// construction and the client secret never leaves the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSet {
    pub authorization_code: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<u64>,
    pub rest_token: Option<String>,
    pub rest_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new("client_id", "client_secret", "redirect_uri", "state")
    }

    #[test]
    fn identity_accessors_roundtrip() {
        let mut session = test_session();
        assert_eq!(session.client_id(), "client_id");
        assert_eq!(session.client_secret(), "client_secret");
        assert_eq!(session.redirect_uri(), "redirect_uri");
        assert_eq!(session.state(), "state");

        session.set_client_id("other_client");
        session.set_client_secret("other_secret");
        session.set_redirect_uri("other_redirect");
        session.set_state("other_state");
        assert_eq!(session.client_id(), "other_client");
        assert_eq!(session.client_secret(), "other_secret");
        assert_eq!(session.redirect_uri(), "other_redirect");
        assert_eq!(session.state(), "other_state");
    }

    #[test]
    fn token_accessors_roundtrip_including_none() {
        let mut session = test_session();

        session.set_authorization_code(Some("code".into()));
        assert_eq!(session.authorization_code(), Some("code"));
        session.set_authorization_code(None);
        assert_eq!(session.authorization_code(), None);

        session.set_access_token(Some("at".into()));
        assert_eq!(session.access_token(), Some("at"));
        session.set_access_token(None);
        assert_eq!(session.access_token(), None);

        session.set_refresh_token(Some("rt".into()));
        assert_eq!(session.refresh_token(), Some("rt"));
        session.set_refresh_token(None);
        assert_eq!(session.refresh_token(), None);

        session.set_token_expires_at(Some(1754000000));
        assert_eq!(session.token_expires_at(), Some(1754000000));
        session.set_token_expires_at(None);
        assert_eq!(session.token_expires_at(), None);

        session.set_rest_token(Some("bh".into()));
        assert_eq!(session.rest_token(), Some("bh"));
        session.set_rest_token(None);
        assert_eq!(session.rest_token(), None);

        session.set_rest_url(Some("https://rest.example.com/".into()));
        assert_eq!(session.rest_url(), Some("https://rest.example.com/"));
        session.set_rest_url(None);
        assert_eq!(session.rest_url(), None);
    }

    #[test]
    fn refresh_needed_without_access_token() {
        let session = test_session();
        assert!(session.should_refresh_token());
    }

    #[test]
    fn refresh_needed_when_expiry_passed() {
        let mut session = test_session();
        session.set_access_token(Some("at".into()));
        session.set_token_expires_at(Some(now_unix() - 1));
        assert!(session.token_has_expired());
        assert!(session.should_refresh_token());
    }

    #[test]
    fn refresh_needed_within_safety_margin() {
        let mut session = test_session();
        session.set_access_token(Some("at".into()));
        // 30 seconds of life left is inside the 60-second margin
        session.set_token_expires_at(Some(now_unix() + 30));
        assert!(session.should_refresh_token());
    }

    #[test]
    fn no_refresh_with_comfortable_expiry() {
        let mut session = test_session();
        session.set_access_token(Some("at".into()));
        session.set_token_expires_at(Some(now_unix() + 3600));
        assert!(!session.token_has_expired());
        assert!(!session.should_refresh_token());
    }

    #[test]
    fn refresh_needed_when_expiry_missing() {
        let mut session = test_session();
        session.set_access_token(Some("at".into()));
        assert!(session.should_refresh_token());
    }

    #[test]
    fn rest_login_needed_unless_both_fields_present() {
        let mut session = test_session();
        assert!(session.needs_rest_login());

        session.set_rest_token(Some("bh".into()));
        assert!(session.needs_rest_login());

        session.set_rest_url(Some("https://rest.example.com/".into()));
        assert!(!session.needs_rest_login());

        session.set_rest_token(None);
        assert!(session.needs_rest_login());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let mut session = test_session();
        session.set_access_token(Some(String::new()));
        assert!(session.should_refresh_token());

        session.set_authorization_code(Some(String::new()));
        session.set_refresh_token(Some(String::new()));
        assert!(session.lacks_authorization());
    }

    #[test]
    fn authorization_material_clears_lacks_authorization() {
        let mut session = test_session();
        assert!(session.lacks_authorization());

        session.set_authorization_code(Some("code".into()));
        assert!(!session.lacks_authorization());

        session.set_authorization_code(None);
        session.set_refresh_token(Some("rt".into()));
        assert!(!session.lacks_authorization());
    }

    #[test]
    fn apply_token_response_overwrites_and_computes_expiry() {
        let mut session = test_session();
        session.set_access_token(Some("old_at".into()));
        session.set_refresh_token(Some("old_rt".into()));

        let before = now_unix();
        session.apply_token_response("new_at".into(), "new_rt".into(), 600);
        let after = now_unix();

        assert_eq!(session.access_token(), Some("new_at"));
        assert_eq!(session.refresh_token(), Some("new_rt"));
        let expires_at = session.token_expires_at().unwrap();
        assert!(expires_at >= before + 600 && expires_at <= after + 600);
    }

    #[test]
    fn apply_rest_login_writes_both_fields() {
        let mut session = test_session();
        session.apply_rest_login("bh_token".into(), "https://rest.example.com/core/".into());
        assert_eq!(session.rest_token(), Some("bh_token"));
        assert_eq!(session.rest_url(), Some("https://rest.example.com/core/"));
        assert!(!session.needs_rest_login());
    }

    #[test]
    fn token_set_roundtrip_through_disk() {
        let mut session = test_session();
        session.set_authorization_code(Some("code".into()));
        session.set_access_token(Some("at".into()));
        session.set_refresh_token(Some("rt".into()));
        session.set_token_expires_at(Some(1754000000));
        session.apply_rest_login("bh".into(), "https://rest.example.com/".into());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let json = serde_json::to_string_pretty(&session.token_set()).unwrap();
        std::fs::write(&path, json).unwrap();

        let restored: TokenSet =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let mut fresh = test_session();
        fresh.restore_tokens(restored);

        assert_eq!(fresh.authorization_code(), Some("code"));
        assert_eq!(fresh.access_token(), Some("at"));
        assert_eq!(fresh.refresh_token(), Some("rt"));
        assert_eq!(fresh.token_expires_at(), Some(1754000000));
        assert_eq!(fresh.rest_token(), Some("bh"));
        assert_eq!(fresh.rest_url(), Some("https://rest.example.com/"));
    }

    #[test]
    fn debug_output_redacts_the_client_secret() {
        let session = Session::new("client_id", "s3cr3t-value", "redirect_uri", "state");
        let debug = format!("{session:?}");
        assert!(!debug.contains("s3cr3t-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
