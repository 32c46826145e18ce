//! Provider descriptions for the supported CRM deployments
//!
//! One implementation serves both flow shapes the hosted CRMs expose: the
//! two-stage Bullhorn flow (OAuth token, then a REST login that yields the
//! session token and tenant base URL) and the plain single-stage OAuth flow.
//! The optional REST login URL is the capability flag selecting between
//! them; the token endpoint's error body shape is the other per-deployment
//! difference.

use common::{Error, Result};

use crate::constants::{AUTHORIZE_ENDPOINT, REST_LOGIN_ENDPOINT, TOKEN_ENDPOINT};

/// Shape of the token endpoint's 4xx error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEnvelope {
    /// `{"error": "...", "error_description": "..."}`
    Flat,
    /// `{"errors": [{"status": "...", "title": "..."}]}`
    List,
}

/// Endpoint set and capabilities of one CRM deployment.
///
/// When `rest_login_url` is present the deployment is two-stage: `connect()`
/// follows a successful OAuth exchange with the REST login, and the decision
/// logic treats a live REST session as proof that authorization already
/// happened.
#[derive(Debug, Clone)]
pub struct Provider {
    name: String,
    authorize_url: String,
    token_url: String,
    rest_login_url: Option<String>,
    error_envelope: ErrorEnvelope,
}

impl Provider {
    /// The hosted Bullhorn cluster: two-stage flow, flat error envelope.
    pub fn bullhorn() -> Self {
        Self {
            name: "bullhorn".into(),
            authorize_url: AUTHORIZE_ENDPOINT.into(),
            token_url: TOKEN_ENDPOINT.into(),
            rest_login_url: Some(REST_LOGIN_ENDPOINT.into()),
            error_envelope: ErrorEnvelope::Flat,
        }
    }

    /// Describe a custom deployment. Starts single-stage; chain
    /// [`with_rest_login`](Self::with_rest_login) for two-stage flows.
    pub fn new(
        name: impl Into<String>,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
        error_envelope: ErrorEnvelope,
    ) -> Result<Self> {
        let authorize_url = authorize_url.into();
        let token_url = token_url.into();
        validate_endpoint("authorize endpoint", &authorize_url)?;
        validate_endpoint("token endpoint", &token_url)?;

        Ok(Self {
            name: name.into(),
            authorize_url,
            token_url,
            rest_login_url: None,
            error_envelope,
        })
    }

    /// Add a REST login stage, making the flow two-stage.
    pub fn with_rest_login(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        validate_endpoint("REST login endpoint", &url)?;
        self.rest_login_url = Some(url);
        Ok(self)
    }

    /// Deployment identifier used in log fields.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn rest_login_url(&self) -> Option<&str> {
        self.rest_login_url.as_deref()
    }

    /// Whether this deployment has the REST login stage (two-stage flow).
    pub fn has_rest_login(&self) -> bool {
        self.rest_login_url.is_some()
    }

    pub fn error_envelope(&self) -> ErrorEnvelope {
        self.error_envelope
    }
}

fn validate_endpoint(what: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Config(format!(
            "{what} must start with http:// or https://, got: {url}"
        )));
    }
    Ok(())
}
