//! Transport layer abstraction
//!
//! This module provides the transport abstraction that lets the connection
//! engine dial servers without knowing which environment it runs in, plus
//! the process-wide registry entry points populate with the transport that
//! subsequent connection attempts must use.

use crate::error::Result;
use crate::options::{ConnectionOptions, ServerAddr};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

/// Transport trait for establishing and operating a byte-stream connection
#[async_trait::async_trait]
pub trait Transport: Send + 'static {
    /// Dial the resolved address on behalf of the given server entry
    async fn dial(
        &mut self,
        server: &ServerAddr,
        addr: SocketAddr,
        options: &ConnectionOptions,
    ) -> Result<()>;

    /// Read data from the connection
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all data to the connection
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush buffered data
    async fn flush(&mut self) -> Result<()>;

    /// Close the connection
    async fn close(&mut self) -> Result<()>;

    /// Check if the connection is encrypted
    fn is_encrypted(&self) -> bool;

    /// Get the remote address, if connected
    fn peer_addr(&self) -> Option<SocketAddr>;
}

/// DNS resolution strategy paired with a transport
///
/// Implementations follow the host environment's native resolution
/// semantics (hosts-file overrides, OS address ordering).
#[async_trait::async_trait]
pub trait DnsResolver: Send + Sync + 'static {
    /// Resolve a hostname to one or more socket addresses
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>>;
}

/// Zero-argument factory producing a transport instance on demand
///
/// Construction is deferred to the connection engine's dial attempt;
/// invoking the factory must not perform I/O.
pub type TransportFactory = Arc<dyn Fn() -> Box<dyn Transport> + Send + Sync>;

/// The paired (transport factory, DNS resolver) unit registered for
/// connection attempts
#[derive(Clone)]
pub struct TransportDescriptor {
    /// Lazy constructor for transport instances
    pub factory: TransportFactory,
    /// Resolution strategy matching the factory's environment
    pub resolver: Arc<dyn DnsResolver>,
}

impl TransportDescriptor {
    /// Create a descriptor from a factory closure and a resolver
    pub fn new<F>(factory: F, resolver: Arc<dyn DnsResolver>) -> Self
    where
        F: Fn() -> Box<dyn Transport> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            resolver,
        }
    }
}

impl std::fmt::Debug for TransportDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportDescriptor").finish_non_exhaustive()
    }
}

static ACTIVE_DESCRIPTOR: Mutex<Option<TransportDescriptor>> = Mutex::new(None);

/// Register the transport descriptor for subsequent connection attempts
///
/// Overwrites any previously registered descriptor; the last writer wins
/// for the lifetime of the process. Registration never constructs a
/// transport and never performs I/O.
pub fn set_transport_descriptor(descriptor: TransportDescriptor) {
    let mut slot = ACTIVE_DESCRIPTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = Some(descriptor);
}

/// Get a snapshot of the currently registered transport descriptor
///
/// The engine captures this by value when a connection attempt starts;
/// later registrations do not affect attempts already in flight.
pub fn active_transport_descriptor() -> Option<TransportDescriptor> {
    ACTIVE_DESCRIPTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
