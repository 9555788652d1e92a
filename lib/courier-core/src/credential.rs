//! Credential formatting.
//!
//! Turns Basic, Bearer and API-key credentials into header entries.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Name of the header written by Basic and Bearer credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Format a Basic `Authorization` value.
///
/// ```
/// assert_eq!(courier_core::format_basic("user", "pass"), "Basic dXNlcjpwYXNz");
/// ```
#[must_use]
pub fn format_basic(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format_authorization("Basic", &encoded)
}

/// Format a Bearer `Authorization` value.
#[must_use]
pub fn format_bearer(token: &str) -> String {
    format_authorization("Bearer", token)
}

/// API keys are sent verbatim under their own header name.
#[must_use]
pub fn format_api_key(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

/// Format an `Authorization` value as `<type> <value>`.
#[must_use]
pub fn format_authorization(auth_type: &str, value: &str) -> String {
    format!("{auth_type} {value}")
}

/// A credential producing exactly one header entry.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// HTTP Basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// Token.
        token: String,
    },
    /// API key sent in a custom header.
    ApiKey {
        /// Header name.
        name: String,
        /// Key value.
        value: String,
    },
}

impl Credential {
    /// Basic credential.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer credential.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// API-key credential.
    #[must_use]
    pub fn api_key(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Name of the header this credential writes.
    #[must_use]
    pub fn header_name(&self) -> &str {
        match self {
            Self::Basic { .. } | Self::Bearer { .. } => AUTHORIZATION,
            Self::ApiKey { name, .. } => name,
        }
    }

    /// The `(name, value)` header entry.
    #[must_use]
    pub fn header(&self) -> (String, String) {
        match self {
            Self::Basic { username, password } => {
                (AUTHORIZATION.to_string(), format_basic(username, password))
            }
            Self::Bearer { token } => (AUTHORIZATION.to_string(), format_bearer(token)),
            Self::ApiKey { name, value } => format_api_key(name, value),
        }
    }
}

// Secrets are never printed.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::ApiKey { name, .. } => f
                .debug_struct("ApiKey")
                .field("name", name)
                .field("value", &"***")
                .finish(),
        }
    }
}
