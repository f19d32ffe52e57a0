//! Connection engine for Cirrus
//!
//! This module owns the connection attempt itself: it walks the configured
//! server list, resolves candidate addresses through the registered DNS
//! strategy, and dials each one through a lazily constructed transport.

use crate::error::{Error, Result};
use crate::options::{ConnectionOptions, ServerAddr};
use crate::transport::{self, Transport, TransportDescriptor};
use std::net::SocketAddr;
use tokio::time;
use tracing::{debug, trace, warn};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connection is established and ready
    Connected,
    /// Connection is closed
    Closed,
}

/// An established client connection
pub struct Connection {
    transport: Box<dyn Transport>,
    server: ServerAddr,
    options: ConnectionOptions,
    state: ConnectionState,
}

impl Connection {
    /// Connect using the process-wide registered transport descriptor
    ///
    /// The descriptor is captured by value before the first dial attempt;
    /// registrations made while this call is in flight do not affect it.
    pub async fn connect(options: ConnectionOptions) -> Result<Connection> {
        let descriptor = transport::active_transport_descriptor().ok_or(Error::NoTransport)?;
        Self::connect_with(descriptor, options).await
    }

    /// Connect using an explicitly supplied transport descriptor
    pub async fn connect_with(
        descriptor: TransportDescriptor,
        options: ConnectionOptions,
    ) -> Result<Connection> {
        let servers = options.server_addrs()?;
        let mut last_err = None;

        for server in servers {
            match Self::dial_server(&descriptor, &server, &options).await {
                Ok(transport) => {
                    debug!(server = %server, encrypted = transport.is_encrypted(), "connection established");
                    return Ok(Connection {
                        transport,
                        server,
                        options,
                        state: ConnectionState::Connected,
                    });
                }
                Err(err) => {
                    warn!(server = %server, error = %err, "connection attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Connection("no servers configured".to_string())))
    }

    /// Dial every resolved address for one server entry, first success wins
    async fn dial_server(
        descriptor: &TransportDescriptor,
        server: &ServerAddr,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn Transport>> {
        // IP literals bypass the resolver
        let addrs = match server.ip() {
            Some(ip) => vec![SocketAddr::new(ip, server.port())],
            None => {
                descriptor
                    .resolver
                    .resolve(server.host(), server.port())
                    .await?
            }
        };

        let mut last_err = None;
        for addr in addrs {
            trace!(server = %server, %addr, "dialing");
            // transport construction is deferred to this point
            let mut transport = (descriptor.factory)();
            match time::timeout(
                options.connect_timeout,
                transport.dial(server, addr, options),
            )
            .await
            {
                Ok(Ok(())) => return Ok(transport),
                Ok(Err(err)) => last_err = Some(err),
                Err(_) => last_err = Some(Error::Timeout(options.connect_timeout)),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::dns(server.host(), "no addresses returned")))
    }

    /// The server entry this connection was established against
    pub fn server(&self) -> &ServerAddr {
        &self.server
    }

    /// The options this connection was established with
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// The connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Check if the connection is established
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Check if the connection runs over an encrypted transport
    pub fn is_encrypted(&self) -> bool {
        self.transport.is_encrypted()
    }

    /// The remote address, if the transport knows it
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.transport.peer_addr()
    }

    /// Read data from the connection
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.state == ConnectionState::Closed {
            return Err(Error::Connection("connection closed".to_string()));
        }
        self.transport.read(buf).await
    }

    /// Write all data to the connection
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Err(Error::Connection("connection closed".to_string()));
        }
        self.transport.write_all(buf).await
    }

    /// Flush buffered data
    pub async fn flush(&mut self) -> Result<()> {
        self.transport.flush().await
    }

    /// Close the connection
    pub async fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        self.transport.close().await
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.server)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TlsOptions;
    use crate::transport::{DnsResolver, TransportDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory transport: dials instantly, echoes written bytes on read
    struct MemoryTransport {
        dialed: Option<SocketAddr>,
        buffer: Vec<u8>,
        refuse: bool,
    }

    impl MemoryTransport {
        fn new(refuse: bool) -> Self {
            Self {
                dialed: None,
                buffer: Vec::new(),
                refuse,
            }
        }
    }

    #[async_trait::async_trait]
    impl Transport for MemoryTransport {
        async fn dial(
            &mut self,
            _server: &ServerAddr,
            addr: SocketAddr,
            _options: &ConnectionOptions,
        ) -> Result<()> {
            if self.refuse {
                return Err(Error::Connection("mock refused".to_string()));
            }
            self.dialed = Some(addr);
            Ok(())
        }

        async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let n = std::cmp::min(buf.len(), self.buffer.len());
            buf[..n].copy_from_slice(&self.buffer[..n]);
            self.buffer.drain(..n);
            Ok(n)
        }

        async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
            self.buffer.extend_from_slice(buf);
            Ok(())
        }

        async fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn is_encrypted(&self) -> bool {
            false
        }

        fn peer_addr(&self) -> Option<SocketAddr> {
            self.dialed
        }
    }

    struct StaticResolver(Vec<SocketAddr>);

    #[async_trait::async_trait]
    impl DnsResolver for StaticResolver {
        async fn resolve(&self, _host: &str, _port: u16) -> Result<Vec<SocketAddr>> {
            Ok(self.0.clone())
        }
    }

    fn memory_descriptor(refuse: bool, constructions: Arc<AtomicUsize>) -> TransportDescriptor {
        TransportDescriptor::new(
            move || {
                constructions.fetch_add(1, Ordering::SeqCst);
                Box::new(MemoryTransport::new(refuse))
            },
            Arc::new(StaticResolver(vec![SocketAddr::from(([127, 0, 0, 1], 4870))])),
        )
    }

    #[tokio::test]
    async fn test_connect_with_dials_lazily() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let descriptor = memory_descriptor(false, constructions.clone());

        let opts = ConnectionOptions::new().server("demo.internal:4870");
        let conn = Connection::connect_with(descriptor, opts).await.unwrap();

        assert!(conn.is_connected());
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert_eq!(conn.server().host(), "demo.internal");
        assert_eq!(conn.peer_addr(), Some(SocketAddr::from(([127, 0, 0, 1], 4870))));
    }

    #[tokio::test]
    async fn test_options_reach_engine_unchanged() {
        let descriptor = memory_descriptor(false, Arc::new(AtomicUsize::new(0)));
        let opts = ConnectionOptions::new()
            .server("demo.internal")
            .tls(TlsOptions::new().verify(false))
            .name("probe");

        let conn = Connection::connect_with(descriptor, opts).await.unwrap();
        let tls = conn.options().tls.as_ref().unwrap();
        assert!(!tls.verify);
        assert_eq!(conn.options().name.as_deref(), Some("probe"));
    }

    #[tokio::test]
    async fn test_dial_failure_passes_through() {
        let descriptor = memory_descriptor(true, Arc::new(AtomicUsize::new(0)));
        let opts = ConnectionOptions::new().server("demo.internal");

        let err = Connection::connect_with(descriptor, opts).await.unwrap_err();
        match err {
            Error::Connection(msg) => assert_eq!(msg, "mock refused"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_roundtrip_and_close() {
        let descriptor = memory_descriptor(false, Arc::new(AtomicUsize::new(0)));
        let mut conn = Connection::connect_with(descriptor, ConnectionOptions::default())
            .await
            .unwrap();

        conn.write_all(b"hello").await.unwrap();
        let mut buf = [0u8; 8];
        let n = conn.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");

        conn.close().await.unwrap();
        assert!(!conn.is_connected());
        assert!(conn.write_all(b"late").await.is_err());
        // closing twice is fine
        conn.close().await.unwrap();
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn test_failed_attempts_are_logged() {
        let descriptor = memory_descriptor(true, Arc::new(AtomicUsize::new(0)));
        let opts = ConnectionOptions::new().server("demo.internal");

        let _ = Connection::connect_with(descriptor, opts).await;
        assert!(logs_contain("connection attempt failed"));
    }

    #[tokio::test]
    async fn test_default_server_when_list_empty() {
        let descriptor = memory_descriptor(false, Arc::new(AtomicUsize::new(0)));
        let conn = Connection::connect_with(descriptor, ConnectionOptions::default())
            .await
            .unwrap();
        assert_eq!(conn.server().host(), "127.0.0.1");
        assert_eq!(conn.server().port(), crate::options::DEFAULT_PORT);
    }
}
