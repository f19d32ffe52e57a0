//! TCP Transport for Cirrus
//!
//! This crate provides the plain TCP dialing transport and the native DNS
//! resolver used by the Cirrus client on socket-capable platforms.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![doc(html_root_url = "https://docs.rs/cirrus-transport-tcp/")]

pub mod dns;
pub mod tcp;

// Re-export TCP transport types
pub use dns::NativeDnsResolver;
pub use tcp::TcpTransport;

/// Prelude module
pub mod prelude {
    pub use crate::dns::NativeDnsResolver;
    pub use crate::tcp::TcpTransport;
    pub use cirrus_core::transport::{DnsResolver, Transport};
}
