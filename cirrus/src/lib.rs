//! # Cirrus
//!
//! **Lightweight async messaging-client library with pluggable socket transports**
//!
//! Cirrus separates the environment-independent connection engine from the
//! environment-specific transport entry points. The native entry point
//! validates caller options against the TCP/TLS socket transport's
//! capabilities before any I/O is attempted, registers that transport for
//! the connection engine, and delegates the connection attempt to it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cirrus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> cirrus::Result<()> {
//!     let mut conn = cirrus::client::connect(
//!         ConnectionOptions::new().server("tls://demo.cirrus.rs"),
//!     )
//!     .await?;
//!
//!     conn.write_all(b"hello").await?;
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![doc(html_root_url = "https://docs.rs/cirrus/")]

// Re-export core components
pub use cirrus_core::*;

#[cfg(feature = "transport-tcp")]
pub use cirrus_transport_tcp as transport_tcp;

#[cfg(feature = "transport-tls")]
pub use cirrus_transport_tls as transport_tls;

#[cfg(feature = "client")]
pub use cirrus_client as client;

/// Prelude module with common imports
pub mod prelude {
    pub use cirrus_core::prelude::*;

    #[cfg(feature = "client")]
    pub use cirrus_client::prelude::*;

    #[cfg(feature = "transport-tcp")]
    pub use cirrus_transport_tcp::prelude::*;

    #[cfg(feature = "transport-tls")]
    pub use cirrus_transport_tls::prelude::*;
}
