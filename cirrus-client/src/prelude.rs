//! Prelude module for Cirrus Client
//!
//! This module re-exports commonly used types and traits to make them
//! easily accessible for users of the client library.

pub use crate::connect::connect;
pub use crate::native::{native_transport_descriptor, NativeTransport};

// Re-export core types for convenience
pub use cirrus_core::prelude::*;

// Re-export commonly used external dependencies
pub use std::net::SocketAddr;
pub use std::time::Duration;
