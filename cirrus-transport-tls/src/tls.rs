//! TLS transport implementation for Cirrus
//!
//! This module provides the TLS dialing transport together with the rustls
//! client configuration derived from caller-supplied [`TlsOptions`].

use async_trait::async_trait;
use cirrus_core::options::{ConnectionOptions, ServerAddr, TlsOptions};
use cirrus_core::transport::Transport;
use cirrus_core::{Error, Result};
use rustls::{Certificate, ClientConfig, PrivateKey, RootCertStore, ServerName};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream as TokioTcpStream;
use tokio_rustls::TlsConnector;

/// TLS transport dialing over TCP
pub struct TlsTransport {
    stream: Option<tokio_rustls::client::TlsStream<TokioTcpStream>>,
    remote_addr: Option<SocketAddr>,
}

impl std::fmt::Debug for TlsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsTransport")
            .field("remote_addr", &self.remote_addr)
            .field("connected", &self.stream.is_some())
            .finish()
    }
}

impl TlsTransport {
    /// Create an unconnected TLS transport
    pub fn new() -> Self {
        Self {
            stream: None,
            remote_addr: None,
        }
    }
}

impl Default for TlsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn dial(
        &mut self,
        server: &ServerAddr,
        addr: SocketAddr,
        options: &ConnectionOptions,
    ) -> Result<()> {
        let tcp = TokioTcpStream::connect(addr).await.map_err(Error::Io)?;
        if options.no_delay {
            tcp.set_nodelay(true).map_err(Error::Io)?;
        }
        let remote_addr = tcp.peer_addr().ok();

        let config = client_config_from_options(options.tls.as_ref())?;
        let name = options
            .tls
            .as_ref()
            .and_then(|t| t.server_name.clone())
            .unwrap_or_else(|| server.host().to_string());
        let domain = ServerName::try_from(name.as_str())
            .map_err(|e| Error::Tls(format!("invalid server name '{name}': {e}")))?;

        let connector = TlsConnector::from(Arc::new(config));
        let stream = connector
            .connect(domain, tcp)
            .await
            .map_err(|e| Error::Tls(format!("handshake with '{name}' failed: {e}")))?;

        self.remote_addr = remote_addr;
        self.stream = Some(stream);
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.stream {
            Some(stream) => stream.read(buf).await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match &mut self.stream {
            Some(stream) => stream.write_all(buf).await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn flush(&mut self) -> Result<()> {
        match &mut self.stream {
            Some(stream) => stream.flush().await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await.map_err(Error::Io)?;
        }
        Ok(())
    }

    fn is_encrypted(&self) -> bool {
        true
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}

/// Build a rustls client configuration from TLS options
///
/// With no options, or options left at their defaults, this yields a
/// webpki-rooted configuration with full certificate verification. The
/// structure is consumed as supplied by the caller; in particular,
/// `verify = false` swaps in a verifier that accepts any chain.
pub fn client_config_from_options(tls: Option<&TlsOptions>) -> Result<ClientConfig> {
    let mut root_store = RootCertStore::empty();
    root_store.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    if let Some(path) = tls.and_then(|t| t.ca_file.as_deref()) {
        for cert in load_certs(path)? {
            root_store
                .add(&cert)
                .map_err(|e| Error::Tls(format!("invalid CA certificate in {path:?}: {e}")))?;
        }
    }

    let builder = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_store);

    let mut config = match tls {
        Some(t) if t.cert_file.is_some() || t.key_file.is_some() => {
            let (Some(cert), Some(key)) = (t.cert_file.as_deref(), t.key_file.as_deref()) else {
                return Err(Error::Tls(
                    "client authentication requires both cert_file and key_file".to_string(),
                ));
            };
            builder
                .with_client_auth_cert(load_certs(cert)?, load_private_key(key)?)
                .map_err(|e| Error::Tls(format!("invalid client certificate: {e}")))?
        }
        _ => builder.with_no_client_auth(),
    };

    if let Some(t) = tls {
        if !t.verify {
            config
                .dangerous()
                .set_certificate_verifier(Arc::new(NoVerification));
        }
    }

    Ok(config)
}

fn load_certs(path: &Path) -> Result<Vec<Certificate>> {
    let file = File::open(path)
        .map_err(|e| Error::Tls(format!("cannot open certificate file {path:?}: {e}")))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .map_err(|e| Error::Tls(format!("cannot parse certificate file {path:?}: {e}")))?;
    if certs.is_empty() {
        return Err(Error::Tls(format!("no certificates found in {path:?}")));
    }
    Ok(certs.into_iter().map(Certificate).collect())
}

fn load_private_key(path: &Path) -> Result<PrivateKey> {
    let file =
        File::open(path).map_err(|e| Error::Tls(format!("cannot open key file {path:?}: {e}")))?;
    let mut reader = BufReader::new(file);
    loop {
        match rustls_pemfile::read_one(&mut reader)
            .map_err(|e| Error::Tls(format!("cannot parse key file {path:?}: {e}")))?
        {
            Some(rustls_pemfile::Item::PKCS8Key(key))
            | Some(rustls_pemfile::Item::RSAKey(key))
            | Some(rustls_pemfile::Item::ECKey(key)) => return Ok(PrivateKey(key)),
            Some(_) => continue,
            None => return Err(Error::Tls(format!("no private key found in {path:?}"))),
        }
    }
}

/// Certificate verifier that accepts any server chain
///
/// Installed only when the caller explicitly disables verification.
struct NoVerification;

impl rustls::client::ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> std::result::Result<rustls::client::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::ServerCertVerified::assertion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_builds() {
        let config = client_config_from_options(None).unwrap();
        // webpki roots are loaded
        assert!(config.alpn_protocols.is_empty());

        let config = client_config_from_options(Some(&TlsOptions::default()));
        assert!(config.is_ok());
    }

    #[test]
    fn test_verification_disabled_config_builds() {
        let tls = TlsOptions::new().verify(false);
        assert!(client_config_from_options(Some(&tls)).is_ok());
    }

    #[test]
    fn test_missing_ca_file_errors() {
        let tls = TlsOptions::new().ca_file("/does/not/exist.pem");
        let err = client_config_from_options(Some(&tls)).unwrap_err();
        assert!(matches!(err, Error::Tls(_)));
    }

    #[test]
    fn test_cert_without_key_errors() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        cert.write_all(b"-----BEGIN CERTIFICATE-----\n-----END CERTIFICATE-----\n")
            .unwrap();

        let tls = TlsOptions::new().cert_file(cert.path());
        let err = client_config_from_options(Some(&tls)).unwrap_err();
        match err {
            Error::Tls(msg) => assert!(msg.contains("key_file")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_key_file_errors() {
        let key = tempfile::NamedTempFile::new().unwrap();
        let err = load_private_key(key.path()).unwrap_err();
        match err {
            Error::Tls(msg) => assert!(msg.contains("no private key")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unconnected_transport_errors() {
        let mut transport = TlsTransport::new();
        assert!(transport.read(&mut [0u8; 4]).await.is_err());
        assert!(transport.write_all(b"x").await.is_err());
        assert!(transport.is_encrypted());
        transport.close().await.unwrap();
    }
}
