//! Tower middleware layers for the hyper transport.
//!
//! Layers wrap the transport, below the dispatcher: they see the fully
//! assembled [`Request`](crate::Request) and the buffered
//! [`Response`](crate::Response). The first layer added is the outermost.
//!
//! - [`LoggingLayer`] - logs each exchange with `tracing`
//! - [`CredentialLayer`] - adds a client-wide credential when the request has none
//!
//! # Example
//!
//! ```ignore
//! use courier::{Credential, HyperClient};
//! use courier::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .with_credential(Credential::bearer("token"))
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod auth;
mod logging;

pub use auth::{CredentialLayer, CredentialService};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
