//! Error types for courier.

use bytes::Bytes;
use derive_more::{Display, Error, From};

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The server answered with a status code of 300 or above.
    ///
    /// `message` is the status line (`"404 Not Found"`), `body` the raw
    /// response body.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status line.
        message: String,
        /// Raw response body.
        #[error(not(source))]
        body: Bytes,
    },

    /// A successful response whose body could not be decoded.
    #[display("decode error ({status}): {message}")]
    #[from(skip)]
    Decode {
        /// HTTP status code.
        status: u16,
        /// Parser or decoder message.
        message: String,
        /// Raw response body.
        #[error(not(source))]
        body: Bytes,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "booking.guest.name").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// XML serialization or deserialization error.
    #[display("XML error: {_0}")]
    #[from(skip)]
    Xml(#[error(not(source))] String),

    /// Server index outside the configured server list.
    #[display("server index {index} out of range (have {len} servers)")]
    #[from(skip)]
    ServerIndex {
        /// Requested index.
        index: usize,
        /// Number of configured servers.
        len: usize,
    },

    /// Server variable value outside its enumeration.
    #[display("value '{value}' for server variable '{name}' is not one of {allowed:?}")]
    #[from(skip)]
    ServerVariable {
        /// Variable name.
        name: String,
        /// Rejected value.
        value: String,
        /// Allowed values.
        allowed: Vec<String>,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(status: u16, message: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::Decode {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if a successful response failed to decode.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns the HTTP status code of a classified error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (500..600).contains(status))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Raw response body of a classified error.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Try to decode the body of a classified error as JSON.
    ///
    /// Returns `None` when the error carries no body.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     code: String,
    ///     message: String,
    /// }
    ///
    /// match client.builder("/booking/:code").build_path(&query).call::<Booking>(None).await {
    ///     Ok(response) => println!("{:?}", response.body()),
    ///     Err(e) => {
    ///         if let Some(Ok(api_error)) = e.decode_body::<ApiError>() {
    ///             println!("API error: {} - {}", api_error.code, api_error.message);
    ///         }
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
