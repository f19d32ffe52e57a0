//! Cirrus Client
//!
//! Native socket entry point for the Cirrus messaging-client library.
//!
//! This crate validates caller options against the native TCP/TLS
//! transport's capabilities, registers the native transport with the
//! connection engine, and delegates the connection attempt to it.
//! WebSocket servers are rejected here; they are served by a separate
//! WebSocket-capable client package.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cirrus_client::connect;
//! use cirrus_core::ConnectionOptions;
//!
//! #[tokio::main]
//! async fn main() -> cirrus_core::Result<()> {
//!     let mut conn = connect(ConnectionOptions::new().server("demo.cirrus.rs")).await?;
//!     conn.write_all(b"hello").await?;
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![doc(html_root_url = "https://docs.rs/cirrus-client/")]

// Public modules
pub mod connect;
pub mod native;

// Prelude module
pub mod prelude;

// Re-export key types for convenience
pub use connect::connect;
pub use native::{native_transport_descriptor, NativeTransport};
