use bytes::Bytes;
use eyre::Context;
use http_body_util::Full;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

/// Client used by the network sink: plain http or https, request bodies sent in one piece.
pub(crate) type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Clone, Default, Debug)]
pub(crate) struct Builder {
    client_builder: Option<hyper_util::client::legacy::Builder>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Override the Hyper client [`Builder`](hyper_util::client::legacy::Builder) used to construct this client.
    pub(crate) fn hyper_builder(self, client_builder: hyper_util::client::legacy::Builder) -> Self {
        Self {
            client_builder: Some(client_builder),
        }
    }

    pub(crate) fn build(self) -> eyre::Result<HttpsClient> {
        let mut roots = rustls::RootCertStore::empty();
        let native = rustls_native_certs::load_native_certs();
        for err in &native.errors {
            tracing::debug!("skipping native certificate: {}", err);
        }
        let (added, ignored) = roots.add_parsable_certificates(native.certs);
        tracing::trace!("loaded {} native root certificates, ignored {}", added, ignored);

        let tls_config = rustls::ClientConfig::builder_with_provider(
            rustls::crypto::aws_lc_rs::default_provider().into(),
        )
        .with_safe_default_protocol_versions()
        .context("Failed selecting TLS protocol versions")?
        .with_root_certificates(roots)
        .with_no_client_auth();

        let mut http_connector = HttpConnector::new();
        http_connector.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector);

        let client_builder = self
            .client_builder
            .unwrap_or_else(|| hyper_util::client::legacy::Builder::new(TokioExecutor::new()));

        Ok(client_builder.build(connector))
    }
}
