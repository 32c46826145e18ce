//! OAuth token and REST login exchanges
//!
//! The two wire interactions of the token lifecycle:
//! 1. OAuth token exchange (authorization-code grant on the first connect,
//!    refresh-token grant once a refresh token is known)
//! 2. REST login (two-stage deployments: access token → session token and
//!    tenant base URL)
//!
//! Both POST form-encoded bodies. Grant selection is driven entirely by the
//! session: a known refresh token always wins over a stored authorization
//! code, so re-authorization is never required once a refresh token exists.

use serde::Deserialize;
use tracing::debug;

use crate::constants::REST_API_VERSION;
use crate::error::{Error, Result};
use crate::provider::{ErrorEnvelope, Provider};
use crate::session::Session;

/// Response from the token endpoint for both grant types.
///
/// `expires_in` is a delta in seconds from the response time;
/// `Session::apply_token_response` converts it to an absolute unix
/// timestamp when storing it.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
}

/// Response from the REST login endpoint.
#[derive(Debug, Deserialize)]
pub struct RestLoginResponse {
    #[serde(rename = "BhRestToken")]
    pub rest_token: String,
    #[serde(rename = "restUrl")]
    pub rest_url: String,
}

/// Exchange authorization material for an OAuth token pair.
///
/// Sends the refresh-token grant when the session knows a refresh token,
/// the authorization-code grant otherwise. Token values are passed through
/// opaque; the server's acceptance is the only validation.
pub async fn acquire_access_token(
    http: &reqwest::Client,
    provider: &Provider,
    session: &Session,
) -> Result<TokenResponse> {
    let mut form: Vec<(&str, &str)> = vec![
        ("client_id", session.client_id()),
        ("client_secret", session.client_secret()),
    ];
    match session.refresh_token().filter(|t| !t.is_empty()) {
        Some(refresh_token) => {
            form.push(("refresh_token", refresh_token));
            form.push(("grant_type", "refresh_token"));
            debug!(provider = %provider.name(), "requesting access token via refresh-token grant");
        }
        None => {
            form.push(("code", session.authorization_code().unwrap_or_default()));
            form.push(("grant_type", "authorization_code"));
            form.push(("redirect_uri", session.redirect_uri()));
            debug!(
                provider = %provider.name(),
                "requesting access token via authorization-code grant"
            );
        }
    }

    let response = http
        .post(provider.token_url())
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Api {
            status: None,
            message: format!("token request failed: {e}"),
        })?;

    let status = response.status();
    if status.is_client_error() {
        let body = read_body(response).await;
        return Err(Error::AcquireAccessToken {
            status: status.as_u16(),
            message: parse_error_message(provider.error_envelope(), &body),
        });
    }
    if !status.is_success() {
        let body = read_body(response).await;
        return Err(Error::Api {
            status: Some(status.as_u16()),
            message: format!("token endpoint returned {status}: {body}"),
        });
    }

    response.json::<TokenResponse>().await.map_err(|e| Error::Api {
        status: None,
        message: format!("invalid token response: {e}"),
    })
}

/// Trade an OAuth access token for a REST session token and tenant URL.
///
/// Only meaningful on two-stage deployments; calling it against a provider
/// without a REST login stage is a configuration error.
pub async fn acquire_rest_token(
    http: &reqwest::Client,
    provider: &Provider,
    session: &Session,
) -> Result<RestLoginResponse> {
    let Some(login_url) = provider.rest_login_url() else {
        return Err(common::Error::Config(format!(
            "provider {} has no REST login stage",
            provider.name()
        ))
        .into());
    };

    let form = [
        ("version", REST_API_VERSION),
        ("access_token", session.access_token().unwrap_or_default()),
    ];
    debug!(provider = %provider.name(), "requesting REST session token");

    let response = http
        .post(login_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Api {
            status: None,
            message: format!("REST login request failed: {e}"),
        })?;

    let status = response.status();
    if status.is_client_error() {
        let body = read_body(response).await;
        return Err(Error::AcquireRestToken {
            status: status.as_u16(),
            message: parse_error_message(provider.error_envelope(), &body),
        });
    }
    if !status.is_success() {
        let body = read_body(response).await;
        return Err(Error::Api {
            status: Some(status.as_u16()),
            message: format!("REST login endpoint returned {status}: {body}"),
        });
    }

    response
        .json::<RestLoginResponse>()
        .await
        .map_err(|e| Error::Api {
            status: None,
            message: format!("invalid REST login response: {e}"),
        })
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"))
}

#[derive(Deserialize)]
struct FlatErrorBody {
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Deserialize)]
struct ListErrorBody {
    errors: Vec<ListErrorEntry>,
}

#[derive(Deserialize)]
struct ListErrorEntry {
    #[serde(default)]
    status: String,
    #[serde(default)]
    title: String,
}

/// Extract "code - description" from a 4xx body, falling back to the raw
/// body when it doesn't match the provider's envelope.
fn parse_error_message(envelope: ErrorEnvelope, body: &str) -> String {
    match envelope {
        ErrorEnvelope::Flat => serde_json::from_str::<FlatErrorBody>(body)
            .map(|b| format!("{} - {}", b.error, b.error_description))
            .unwrap_or_else(|_| body.to_string()),
        ErrorEnvelope::List => serde_json::from_str::<ListErrorBody>(body)
            .ok()
            .and_then(|b| b.errors.into_iter().next())
            .map(|e| format!("{} - {}", e.status, e.title))
            .unwrap_or_else(|| body.to_string()),
    }
}
