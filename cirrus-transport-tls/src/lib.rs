//! TLS Transport for Cirrus
//!
//! This crate provides the TLS dialing transport used by the Cirrus client
//! for `tls://` servers and for callers that supply TLS options.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![doc(html_root_url = "https://docs.rs/cirrus-transport-tls/")]

pub mod tls;

// Re-export TLS transport types
pub use tls::{client_config_from_options, TlsTransport};

/// Prelude module
pub mod prelude {
    pub use crate::tls::{client_config_from_options, TlsTransport};
    pub use cirrus_core::transport::Transport;
}
