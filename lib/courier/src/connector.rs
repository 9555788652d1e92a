//! HTTPS connector using rustls.

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

use crate::ClientConfig;

/// Create an HTTP/1.1 + HTTP/2 connector with rustls and the Mozilla roots.
///
/// Plain `http://` URLs are accepted unless `config.https_only` is set.
#[must_use]
pub fn https_connector(config: &ClientConfig) -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(config.tcp_nodelay);

    let builder = HttpsConnectorBuilder::new().with_tls_config(tls_config);
    let builder = if config.https_only {
        builder.https_only()
    } else {
        builder.https_or_http()
    };

    builder.enable_http1().enable_http2().wrap_connector(http)
}
