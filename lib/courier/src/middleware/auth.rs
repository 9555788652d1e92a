//! Client-wide credentials.
//!
//! [`CredentialLayer`] adds a [`Credential`] header to every request that
//! does not already carry it, so per-request credentials set on the builder
//! always take precedence.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Credential, Error, Request, Response, Result};

/// Layer applying a client-wide credential.
///
/// # Example
///
/// ```ignore
/// use courier::{Credential, HyperClient};
///
/// let client = HyperClient::builder()
///     .with_credential(Credential::api_key("X-API-Key", "abc123"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct CredentialLayer {
    credential: Arc<Credential>,
}

impl CredentialLayer {
    /// Apply `credential` to every request lacking its header.
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Arc::new(credential),
        }
    }
}

impl<S> Layer<S> for CredentialLayer {
    type Service = CredentialService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CredentialService {
            inner,
            credential: Arc::clone(&self.credential),
        }
    }
}

/// Service produced by [`CredentialLayer`].
#[derive(Debug, Clone)]
pub struct CredentialService<S> {
    inner: S,
    credential: Arc<Credential>,
}

impl<S> Service<Request<Bytes>> for CredentialService<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        if !request.has_header(self.credential.header_name()) {
            let (name, value) = self.credential.header();
            request.headers_mut().insert(name, value);
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tower::ServiceExt;
    use tower::service_fn;

    use super::*;
    use crate::Method;

    async fn echo_headers(request: Request<Bytes>) -> Result<Response<Bytes>> {
        let (_, _, headers, _) = request.into_parts();
        Ok(Response::new(200, headers, Bytes::new()))
    }

    fn request(headers: &[(&str, &str)]) -> Request<Bytes> {
        let url = url::Url::parse("http://localhost/booking").expect("valid URL");
        let headers: HashMap<String, String> = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Request::from_parts(Method::Get, url, headers, None)
    }

    #[tokio::test]
    async fn adds_missing_header() {
        let service =
            CredentialLayer::new(Credential::bearer("ambient")).layer(service_fn(echo_headers));
        let response = service.oneshot(request(&[])).await.expect("response");
        assert_eq!(response.header("Authorization"), Some("Bearer ambient"));
    }

    #[tokio::test]
    async fn keeps_existing_header() {
        let service =
            CredentialLayer::new(Credential::bearer("ambient")).layer(service_fn(echo_headers));
        let response = service
            .oneshot(request(&[("authorization", "Basic explicit")]))
            .await
            .expect("response");
        assert_eq!(response.header("Authorization"), Some("Basic explicit"));
        assert_eq!(response.headers().len(), 1);
    }
}
