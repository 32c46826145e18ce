//! Bullhorn endpoint constants
//!
//! Endpoint set for the hosted Bullhorn cluster. None of these are secrets —
//! the tenant-specific REST base URL is not listed here because the cluster
//! assigns it per login; it arrives in the REST login response and lives on
//! the `Session`.

/// Authorization endpoint the end user's browser is redirected to
pub const AUTHORIZE_ENDPOINT: &str = "https://auth.bullhornstaffing.com/oauth/authorize";

/// Token endpoint for authorization-code exchange and token refresh
pub const TOKEN_ENDPOINT: &str = "https://auth.bullhornstaffing.com/oauth/token";

/// Login endpoint that trades an OAuth access token for a REST session
pub const REST_LOGIN_ENDPOINT: &str = "https://rest.bullhornstaffing.com/rest-services/login";

/// REST API version requested during login. `*` selects the newest
/// version the cluster supports.
pub const REST_API_VERSION: &str = "*";

/// Session token header attached to every authenticated REST request
pub const REST_TOKEN_HEADER: &str = "BHRestToken";

/// Safety margin applied when checking access-token expiry. A token within
/// this many seconds of its expiry is treated as already expired.
pub const EXPIRY_MARGIN_SECS: u64 = 60;
