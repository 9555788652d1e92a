//! Core types and traits for the courier request-composition layer.
//!
//! This crate provides the building blocks used by `courier`:
//! - [`FieldDescriptor`] and [`ParameterBucket`] - the field tag grammar
//! - [`ToParam`] and [`ParameterSet`] - parameter stringification and storage
//! - [`Decompose`], [`ParameterSink`], [`Parameters`] - record decomposition
//! - [`Credential`] and the `format_*` helpers - authentication headers
//! - [`Payload`] - a request body encoded once the content type is known
//! - [`Request`], [`Response`], [`HttpClient`] - the transport contract
//! - [`Error`] and [`Result`] - error handling

mod body;
mod client;
mod credential;
mod decompose;
mod error;
mod method;
mod multipart;
mod param;
mod payload;
pub mod prelude;
mod request;
mod response;
mod tag;

pub use body::{ContentType, from_json, from_xml, to_form, to_json, to_xml};
pub use client::HttpClient;
pub use credential::{
    AUTHORIZATION, Credential, format_api_key, format_authorization, format_basic, format_bearer,
};
pub use decompose::{Decompose, Decomposition, ParameterSink, Parameters, decompose};
pub use error::{Error, Result};
pub use method::Method;
pub use multipart::{Form, FormFile, Part};
pub use param::{ParameterSet, ToParam};
pub use payload::Payload;
pub use request::{Request, RequestBuilder};
pub use response::{Response, status_line};
pub use tag::{FieldDescriptor, Modifier, ParameterBucket};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
