//! # Cirrus Core
//!
//! Core connection engine and transport abstraction for the Cirrus
//! messaging-client library.
//!
//! This is the core library that provides the environment-independent half
//! of Cirrus. It includes:
//!
//! - Error handling and types
//! - Connection options and server address parsing
//! - Transport and DNS-resolution abstractions
//! - The process-wide transport registry
//! - The connection engine that dials registered transports
//!
//! Environment-specific entry points (such as the native socket client in
//! `cirrus-client`) validate caller options, register a transport
//! descriptor, and delegate to [`Connection::connect`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![doc(html_root_url = "https://docs.rs/cirrus-core/")]

// Core modules
pub mod connection;
pub mod error;
pub mod options;
pub mod transport;

// Prelude module with common imports
pub mod prelude;

// Re-export key types for convenience
pub use connection::{Connection, ConnectionState};
pub use error::{Error, Result};
pub use options::{has_ws_scheme, ConnectionOptions, Scheme, ServerAddr, TlsOptions};
pub use transport::{
    active_transport_descriptor, set_transport_descriptor, DnsResolver, Transport,
    TransportDescriptor, TransportFactory,
};
