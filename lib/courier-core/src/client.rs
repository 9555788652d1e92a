//! Transport trait.
//!
//! The dispatcher only needs a way to turn a fully assembled [`Request`] into
//! a buffered [`Response`]. `courier` ships a hyper-based implementation;
//! anything else (a test double, a proxying client) can be injected by
//! implementing [`HttpClient`].

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Executes HTTP requests.
///
/// Implementations must buffer the whole response body before returning.
/// Transport failures are reported as [`Error::Connection`](crate::Error::Connection)
/// or [`Error::Tls`](crate::Error::Tls); status codes are not interpreted.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

impl<T: HttpClient> HttpClient for &T {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}
