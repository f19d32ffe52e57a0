//! Prelude module for Cirrus Core
//!
//! This module re-exports commonly used types and traits to make them
//! easily accessible for users of the library.

pub use crate::connection::{Connection, ConnectionState};
pub use crate::error::{Error, Result};
pub use crate::options::{ConnectionOptions, Scheme, ServerAddr, TlsOptions};
pub use crate::transport::{DnsResolver, Transport, TransportDescriptor};

// Re-export commonly used external dependencies
pub use async_trait::async_trait;

// Feature-gated re-exports
#[cfg(feature = "serde")]
pub use serde::{Deserialize, Serialize};
