//! Connect orchestration
//!
//! `Client` owns the provider description, the session state, and the HTTP
//! client, and sequences the acquisition steps on every `connect()`:
//! authorize (browser redirect, reported as a value), OAuth token exchange,
//! REST login. Each step runs only when the decision predicates say the
//! current state requires it; a first-ever connect after the redirect
//! callback runs the last two back to back.

use tracing::{debug, info};

use crate::authorize;
use crate::error::Result;
use crate::provider::Provider;
use crate::session::Session;
use crate::token;

/// Outcome of a `connect()` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// The end user's browser must be sent to this authorization URL.
    /// Token acquisition cannot proceed until the redirect callback
    /// supplies an authorization code.
    RedirectRequired(String),
    /// The session holds everything needed for authenticated calls.
    Ready,
}

type UpdateHook = Box<dyn Fn(&Session) + Send + Sync>;

/// Drives a [`Session`] through the token lifecycle against one provider.
///
/// One client serves one logical request context at a time; the update hook
/// runs synchronously inside the triggering call and must not re-enter
/// `connect()`.
pub struct Client {
    provider: Provider,
    session: Session,
    http: reqwest::Client,
    on_token_update: Option<UpdateHook>,
}

impl Client {
    pub fn new(provider: Provider, session: Session) -> Self {
        Self {
            provider,
            session,
            http: reqwest::Client::new(),
            on_token_update: None,
        }
    }

    /// Use a preconfigured HTTP client (custom TLS, proxy, timeouts).
    pub fn with_http_client(provider: Provider, session: Session, http: reqwest::Client) -> Self {
        Self {
            provider,
            session,
            http,
            on_token_update: None,
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access, e.g. to store the authorization code from
    /// the redirect callback or rehydrate persisted tokens.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Register a hook fired after every successful token mutation so the
    /// caller can persist the session. Runs inline; keep it cheap and do
    /// not re-enter `connect()` from inside it.
    pub fn on_token_update(&mut self, hook: impl Fn(&Session) + Send + Sync + 'static) {
        self.on_token_update = Some(Box::new(hook));
    }

    /// True when nothing short of a browser redirect can produce a token:
    /// no authorization code and no refresh token. With a REST login stage
    /// configured, a complete REST session settles the question without
    /// either.
    pub fn should_authorize(&self) -> bool {
        if self.provider.has_rest_login() && !self.session.needs_rest_login() {
            return false;
        }
        self.session.lacks_authorization()
    }

    /// True when the OAuth access token must be (re)acquired: it is absent,
    /// or within the safety margin of its expiry.
    pub fn should_refresh_token(&self) -> bool {
        self.session.should_refresh_token()
    }

    /// True when the REST login exchange must run. Always false for
    /// single-stage providers.
    pub fn should_obtain_rest_token(&self) -> bool {
        self.provider.has_rest_login() && self.session.needs_rest_login()
    }

    /// The URL to send the end user's browser to.
    pub fn authorization_url(&self) -> String {
        authorize::authorization_url(&self.provider, &self.session)
    }

    /// Run whichever acquisition steps the current state calls for.
    ///
    /// Returns [`Connection::RedirectRequired`] without touching the
    /// network when no authorization material exists; otherwise refreshes
    /// the OAuth token and completes the REST login as needed, possibly
    /// both in one call.
    pub async fn connect(&mut self) -> Result<Connection> {
        if self.should_authorize() {
            info!(provider = %self.provider.name(), "authorization required, redirecting");
            return Ok(Connection::RedirectRequired(self.authorization_url()));
        }

        if self.should_refresh_token() {
            self.acquire_access_token().await?;
        } else {
            debug!(provider = %self.provider.name(), "access token still valid, skipping exchange");
        }

        if self.should_obtain_rest_token() {
            self.acquire_rest_token().await?;
        }

        Ok(Connection::Ready)
    }

    /// Run the OAuth token exchange and apply the result to the session.
    pub async fn acquire_access_token(&mut self) -> Result<()> {
        let response =
            token::acquire_access_token(&self.http, &self.provider, &self.session).await?;
        self.session.apply_token_response(
            response.access_token,
            response.refresh_token,
            response.expires_in,
        );
        info!(provider = %self.provider.name(), "access token acquired");
        self.notify_update();
        Ok(())
    }

    /// Run the REST login exchange and apply the result to the session.
    pub async fn acquire_rest_token(&mut self) -> Result<()> {
        let response =
            token::acquire_rest_token(&self.http, &self.provider, &self.session).await?;
        self.session
            .apply_rest_login(response.rest_token, response.rest_url);
        info!(provider = %self.provider.name(), "REST session established");
        self.notify_update();
        Ok(())
    }

    fn notify_update(&self) {
        if let Some(hook) = &self.on_token_update {
            hook(&self.session);
        }
    }
}
