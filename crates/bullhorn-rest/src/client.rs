//! REST client issuing authenticated calls against one tenant

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use bullhorn_auth::Session;
use bullhorn_auth::constants::REST_TOKEN_HEADER;

use crate::{Error, Result};

/// Authenticated client for one tenant's REST base URL.
///
/// The session token and base URL are captured at construction; when the
/// session is renewed (a fresh `connect()` after expiry), build a fresh
/// client from it. One client serves one logical request context at a
/// time — calls run sequentially and block until the response arrives.
pub struct RestClient {
    http: reqwest::Client,
    rest_url: String,
    rest_token: String,
}

impl RestClient {
    /// Build from a tenant base URL and session token.
    pub fn new(rest_url: impl Into<String>, rest_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: rest_url.into(),
            rest_token: rest_token.into(),
        }
    }

    /// Build from a session that has completed the REST login.
    pub fn from_session(session: &Session) -> Result<Self> {
        if session.needs_rest_login() {
            return Err(Error::SessionIncomplete(
                "REST token or base URL missing, run connect() first".into(),
            ));
        }
        Ok(Self::new(
            session.rest_url().unwrap_or_default(),
            session.rest_token().unwrap_or_default(),
        ))
    }

    /// Use a preconfigured HTTP client (custom TLS, proxy, timeouts).
    pub fn with_http_client(
        rest_url: impl Into<String>,
        rest_token: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            rest_url: rest_url.into(),
            rest_token: rest_token.into(),
        }
    }

    /// GET `endpoint`, appending `query` as a URL-encoded query string
    /// when non-empty.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value> {
        let request = self.request(Method::GET, endpoint, query);
        self.dispatch(request).await
    }

    /// POST a JSON-encoded `body` to `endpoint`.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        let request = self.request(Method::POST, endpoint, query).json(body);
        self.dispatch(request).await
    }

    /// Absolute URL: tenant base plus the endpoint with its leading slash
    /// stripped (the base URL from the login response carries a trailing
    /// slash).
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.rest_url, endpoint.trim_start_matches('/'))
    }

    fn request(
        &self,
        http_method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(http_method, self.build_url(endpoint))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(REST_TOKEN_HEADER, &self.rest_token);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        builder
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Api(format!("request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, "REST response received");

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        if status.is_client_error() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::Api(format!("REST API returned {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Api(format!("invalid JSON response: {e}")))
    }
}

#[derive(serde::Deserialize)]
struct UpstreamErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: String,
}

/// Extract `errorMessage` from a 4xx body, falling back to the raw body.
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .map(|b| b.error_message)
        .unwrap_or_else(|_| body.to_string())
}
