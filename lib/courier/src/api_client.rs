//! API client: configuration plus transport.

use std::sync::Arc;

use crate::{Builder, Configuration, HttpClient, HyperClient};

/// Accept header value sent when no other is requested.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Entry point for building requests against one API.
///
/// Holds the read-only [`Configuration`] and a transport. Cloning is cheap:
/// the configuration is shared and the default transport shares its
/// connection pool.
///
/// # Example
///
/// ```ignore
/// use courier::{ApiClient, Configuration};
///
/// let client = ApiClient::new(
///     Configuration::new().base_path("https://booking.example.com/api"),
/// );
///
/// let detail = client
///     .builder("/booking/detail/:uuid")
///     .path("uuid", "c68c5133-6463-49ed-9fef-4f945f5152d7")
///     .call::<serde_json::Value>(None)
///     .await?;
/// ```
#[derive(Debug)]
pub struct ApiClient<C = HyperClient> {
    transport: C,
    config: Arc<Configuration>,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl ApiClient {
    /// Client using the default [`HyperClient`] transport.
    #[must_use]
    pub fn new(config: Configuration) -> Self {
        Self::with_transport(HyperClient::new(), config)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl<C> ApiClient<C> {
    /// Client using a custom transport.
    #[must_use]
    pub fn with_transport(transport: C, config: Configuration) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// The configuration.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// The transport.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Start a request for `uri` (a path template such as
    /// `/booking/detail/:uuid`), accepting JSON.
    pub fn builder(&self, uri: impl Into<String>) -> Builder<'_, C> {
        self.builder_with_accept(uri, std::iter::empty::<&str>())
    }

    /// Start a request accepting JSON plus `accepts`.
    ///
    /// Duplicates are dropped; the order is kept.
    pub fn builder_with_accept<I, S>(&self, uri: impl Into<String>, accepts: I) -> Builder<'_, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut accept = vec![DEFAULT_ACCEPT.to_string()];
        for value in accepts {
            let value = value.into();
            if !accept.iter().any(|known| known.eq_ignore_ascii_case(&value)) {
                accept.push(value);
            }
        }
        Builder::new(&self.transport, &self.config, uri, accept)
    }
}
