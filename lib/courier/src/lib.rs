//! Declarative HTTP request composition.
//!
//! Describe request parameters as a tagged record, chain a few builder
//! calls, and get back a decoded response or a classified error.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Parameters)]
//! struct BookingQuery {
//!     #[http("uuid,path")]
//!     uuid: String,
//!     #[http("bookingCode,query")]
//!     booking_code: String,
//!     #[http("Bearer,header,authorizationType")]
//!     access_token: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct CommonResult {
//!     #[serde(rename = "statusCode")]
//!     status_code: i32,
//!     message: String,
//! }
//!
//! let client = ApiClient::new(Configuration::new().base_path("https://booking.example.com"));
//! let response = client
//!     .builder("/booking/detail/:uuid")
//!     .build_request(&query)
//!     .call::<CommonResult>(None)
//!     .await?;
//! ```
//!
//! Tags follow `name,bucket[,modifier]` where the bucket is one of `header`,
//! `query`, `path`, `form` or `body`; the modifiers are `authorizationType`
//! and `opt`. Fields without a tag are ignored.

mod api_client;
mod builder;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod parser;
mod path;
pub mod prelude;

pub use api_client::{ApiClient, DEFAULT_ACCEPT};
pub use builder::Builder;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{
    ClientConfig, ClientConfigBuilder, Configuration, DEFAULT_BASE_PATH, DEFAULT_USER_AGENT,
    ServerConfiguration, ServerVariable,
};
pub use parser::ResponseParser;

// Re-export tower for middleware composition
pub use tower;

pub use courier_core::{
    AUTHORIZATION, ContentType, Credential, Decompose, Decomposition, Error, FieldDescriptor,
    Form, FormFile, HttpClient, Method, Modifier, ParameterBucket, ParameterSet, ParameterSink,
    Parameters, Part, Payload, Request, RequestBuilder, Response, Result, ToParam, decompose,
    format_api_key, format_authorization, format_basic, format_bearer, from_json, from_xml,
    status_line, to_form, to_json, to_xml,
};

pub use courier_core::{StatusCode, header};

pub use url;

// The derive shares its name with the `Parameters` value; they live in
// different namespaces.
pub use courier_macro::Parameters;
