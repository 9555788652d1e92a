//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    ApiClient, Builder, Configuration, ContentType, Credential, Decompose, Error, HttpClient,
    HyperClient, Method, Parameters, Payload, Response, ResponseParser, Result,
    ServerConfiguration, ServerVariable, StatusCode, ToParam,
};
pub use serde::{Deserialize, Serialize};
