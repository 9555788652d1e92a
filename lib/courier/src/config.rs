//! Client configuration types.
//!
//! [`Configuration`] describes the API being called (base path, default
//! headers, user agent, templated servers). [`ClientConfig`] tunes the
//! connection pool of the default [`HyperClient`](crate::HyperClient).

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::debug;

use crate::{Error, Result};

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

/// Base path used until one is configured.
pub const DEFAULT_BASE_PATH: &str = "http://localhost";

/// A server variable of a templated server URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerVariable {
    /// Human-readable description.
    pub description: String,
    /// Value used when the caller supplies none.
    pub default_value: String,
    /// Allowed values; empty means any value.
    pub enum_values: Vec<String>,
}

impl ServerVariable {
    /// Variable with a default value and no restriction.
    #[must_use]
    pub fn new(default_value: impl Into<String>) -> Self {
        Self {
            default_value: default_value.into(),
            ..Self::default()
        }
    }

    /// Restrict the variable to a set of values.
    #[must_use]
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A server URL template such as `https://{env}.example.com/v1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfiguration {
    /// URL template with `{name}` placeholders.
    pub url: String,
    /// Human-readable description.
    pub description: String,
    /// Variables by name.
    pub variables: BTreeMap<String, ServerVariable>,
}

impl ServerConfiguration {
    /// Server without variables.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    /// Substitute variables into the URL template.
    ///
    /// Supplied values must belong to the variable's enumeration when one is
    /// declared; missing values fall back to the default. Supplied values
    /// for undeclared variables are ignored.
    pub fn resolve(&self, variables: &HashMap<String, String>) -> Result<String> {
        let mut url = self.url.clone();
        for (name, variable) in &self.variables {
            let value = match variables.get(name) {
                Some(value) => {
                    if !variable.enum_values.is_empty() && !variable.enum_values.contains(value) {
                        return Err(Error::ServerVariable {
                            name: name.clone(),
                            value: value.clone(),
                            allowed: variable.enum_values.clone(),
                        });
                    }
                    value
                }
                None => &variable.default_value,
            };
            url = url.replace(&format!("{{{name}}}"), value);
        }
        Ok(url)
    }
}

/// API-level configuration shared by every request of an
/// [`ApiClient`](crate::ApiClient).
///
/// # Example
///
/// ```
/// use courier::Configuration;
///
/// let config = Configuration::new()
///     .base_path("https://api.example.com/v1")
///     .default_header("X-Client", "booking-app")
///     .user_agent("booking-app/2.0");
///
/// assert_eq!(config.get_base_path(), "https://api.example.com/v1");
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    base_path: String,
    default_headers: BTreeMap<String, String>,
    user_agent: String,
    debug: bool,
    servers: Vec<ServerConfiguration>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            default_headers: BTreeMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
            servers: vec![
                ServerConfiguration::new(DEFAULT_BASE_PATH)
                    .with_description("No description provided"),
            ],
        }
    }
}

impl Configuration {
    /// Configuration with the defaults: `http://localhost`, no default
    /// headers, the courier user agent and a single localhost server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base path prefixed to every request URI.
    ///
    /// Empty or unparsable values are ignored and the previous base path is
    /// kept.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        if base_path.is_empty() {
            return self;
        }
        match url::Url::parse(&base_path) {
            Ok(_) => self.base_path = base_path,
            Err(err) => debug!(%base_path, error = %err, "ignoring invalid base path"),
        }
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Log request headers and raw response bodies at debug level.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replace the server list.
    #[must_use]
    pub fn servers(mut self, servers: impl IntoIterator<Item = ServerConfiguration>) -> Self {
        self.servers = servers.into_iter().collect();
        self
    }

    /// Append a server.
    #[must_use]
    pub fn server(mut self, server: ServerConfiguration) -> Self {
        self.servers.push(server);
        self
    }

    /// Resolve server `index` with the given variables and use it as base
    /// path.
    pub fn use_server(self, index: usize, variables: &HashMap<String, String>) -> Result<Self> {
        let url = self.server_url(index, variables)?;
        Ok(self.base_path(url))
    }

    /// Resolve the URL of server `index`.
    pub fn server_url(&self, index: usize, variables: &HashMap<String, String>) -> Result<String> {
        let server = self.servers.get(index).ok_or(Error::ServerIndex {
            index,
            len: self.servers.len(),
        })?;
        server.resolve(variables)
    }

    /// Current base path.
    #[must_use]
    pub fn get_base_path(&self) -> &str {
        &self.base_path
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// `User-Agent` header value.
    #[must_use]
    pub fn get_user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether debug dumping is enabled.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Configured servers.
    #[must_use]
    pub fn get_servers(&self) -> &[ServerConfiguration] {
        &self.servers
    }
}

/// Connection pool configuration for [`HyperClient`](crate::HyperClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection lifetime in the pool.
    pub pool_idle_timeout: Duration,
    /// Disable Nagle's algorithm on connections.
    pub tcp_nodelay: bool,
    /// Refuse plain `http://` URLs.
    pub https_only: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            tcp_nodelay: true,
            https_only: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    tcp_nodelay: Option<bool>,
    https_only: Option<bool>,
}

impl ClientConfigBuilder {
    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection lifetime.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable `TCP_NODELAY`.
    #[must_use]
    pub const fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = Some(nodelay);
        self
    }

    /// Refuse plain `http://` URLs.
    #[must_use]
    pub const fn https_only(mut self, https_only: bool) -> Self {
        self.https_only = Some(https_only);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            tcp_nodelay: self.tcp_nodelay.unwrap_or(defaults.tcp_nodelay),
            https_only: self.https_only.unwrap_or(defaults.https_only),
        }
    }
}
