//! Procedural macros for courier.
//!
//! - `#[derive(Parameters)]` - route the fields of a struct into request
//!   parameters with `#[http("name,bucket[,modifier]")]` tags
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Parameters)]
//! struct BookingLookup {
//!     #[http("code,path")]
//!     code: String,
//!     #[http("lang,query,opt")]
//!     lang: String,
//!     #[http("access-token,authorizationType")]
//!     token: String,
//!     // no tag: never sent
//!     cache_key: u64,
//! }
//! ```

mod attrs;
mod derive;

use proc_macro::TokenStream;

/// Derive `courier::Decompose` for a struct with named fields.
///
/// # Field Attributes
///
/// - `#[http("name,header")]`, `query`, `path`, `form` - route the field to a bucket
///   under `name` (an empty name uses the field name)
/// - `#[http("payload,body")]` - use the field as the request body
///   (`Serialize + Clone + Send + Sync + 'static`; `None` is skipped)
/// - `#[http("name,query,opt")]` - omit the parameter when its value is empty
/// - `#[http("Bearer,header,authorizationType")]` - send `Authorization: Bearer <value>`
/// - `#[http("_header_")]`, `_query_`, `_path_`, `_form_` - a map field replacing the
///   whole bucket
///
/// Fields without a tag, or with a tag that cannot be understood, are ignored
/// and need not implement any trait.
#[proc_macro_derive(Parameters, attributes(http))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    derive::expand_parameters_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
