//! Bullhorn authentication library
//!
//! OAuth2 authorization-code/refresh-token acquisition and Bullhorn's
//! REST-login session exchange, behind a `connect()` state machine that
//! decides which steps must run for the current session state. This crate
//! is a standalone library — callers own persistence (via the update hook
//! and `TokenSet`) and the browser redirect; `bullhorn-rest` issues the
//! authenticated calls afterwards.
//!
//! Connect flow:
//! 1. Caller builds a `Session` with its OAuth client identity
//! 2. `Client::connect()` returns `Connection::RedirectRequired(url)` while
//!    neither an authorization code nor a refresh token exists
//! 3. The redirect callback supplies the code via
//!    `Session::set_authorization_code`
//! 4. `connect()` exchanges it for an access/refresh token pair, then
//!    (two-stage providers) completes the REST login
//! 5. Every successful mutation fires the update hook for persistence
//! 6. Later runs rehydrate via `Session::restore_tokens` and refresh
//!    silently — re-authorization is never needed once a refresh token
//!    is known

pub mod authorize;
pub mod client;
pub mod constants;
pub mod error;
pub mod provider;
pub mod session;
pub mod token;

pub use authorize::{authorization_url, generate_state};
pub use client::{Client, Connection};
pub use constants::*;
pub use error::{Error, Result};
pub use provider::{ErrorEnvelope, Provider};
pub use session::{Session, TokenSet};
pub use token::{RestLoginResponse, TokenResponse, acquire_access_token, acquire_rest_token};
