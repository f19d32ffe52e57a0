//! Native transport assembly for socket-capable platforms
//!
//! [`NativeTransport`] picks plain TCP or TLS per dial based on the server
//! scheme and the presence of TLS options; [`native_transport_descriptor`]
//! pairs its lazy factory with the system DNS resolver.

use async_trait::async_trait;
use cirrus_core::options::{ConnectionOptions, ServerAddr};
use cirrus_core::transport::{Transport, TransportDescriptor};
use cirrus_core::{Error, Result};
use cirrus_transport_tcp::{NativeDnsResolver, TcpTransport};
use cirrus_transport_tls::TlsTransport;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug)]
enum Inner {
    Tcp(TcpTransport),
    Tls(TlsTransport),
}

/// Transport for native TCP/TLS socket environments
///
/// Unconnected until the engine dials it; the TCP-vs-TLS decision is made
/// per attempt, so one factory covers every non-WebSocket scheme.
#[derive(Debug, Default)]
pub struct NativeTransport {
    inner: Option<Inner>,
}

impl NativeTransport {
    /// Create an unconnected native transport
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn active(&mut self) -> Result<&mut dyn Transport> {
        match &mut self.inner {
            Some(Inner::Tcp(t)) => Ok(t),
            Some(Inner::Tls(t)) => Ok(t),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }
}

#[async_trait]
impl Transport for NativeTransport {
    async fn dial(
        &mut self,
        server: &ServerAddr,
        addr: SocketAddr,
        options: &ConnectionOptions,
    ) -> Result<()> {
        if server.scheme().is_secure() || options.tls.is_some() {
            let mut transport = TlsTransport::new();
            transport.dial(server, addr, options).await?;
            self.inner = Some(Inner::Tls(transport));
        } else {
            let mut transport = TcpTransport::new();
            transport.dial(server, addr, options).await?;
            self.inner = Some(Inner::Tcp(transport));
        }
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.active()?.read(buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.active()?.write_all(buf).await
    }

    async fn flush(&mut self) -> Result<()> {
        self.active()?.flush().await
    }

    async fn close(&mut self) -> Result<()> {
        match self.active() {
            Ok(transport) => transport.close().await,
            Err(_) => Ok(()),
        }
    }

    fn is_encrypted(&self) -> bool {
        matches!(self.inner, Some(Inner::Tls(_)))
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        match &self.inner {
            Some(Inner::Tcp(t)) => t.peer_addr(),
            Some(Inner::Tls(t)) => t.peer_addr(),
            None => None,
        }
    }
}

/// Build the descriptor registered by the native `connect` entry point
///
/// The factory defers all construction and I/O to the engine's dial
/// attempt; calling this function has no side effects.
pub fn native_transport_descriptor() -> TransportDescriptor {
    TransportDescriptor::new(
        || Box::new(NativeTransport::new()),
        Arc::new(NativeDnsResolver::new()),
    )
}
