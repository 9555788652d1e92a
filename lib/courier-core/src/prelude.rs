//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Credential, Decompose, Decomposition, Error, HttpClient, Method, ParameterSet,
    Parameters, Payload, Request, Response, Result, ToParam,
};
