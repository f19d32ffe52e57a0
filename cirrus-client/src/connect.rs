//! Native connection entry point
//!
//! This module is the seam between caller options and the connection
//! engine: it rejects option sets the native socket transport cannot
//! serve, registers the native transport descriptor, and hands the
//! attempt to the engine.

use crate::native::native_transport_descriptor;
use cirrus_core::{
    has_ws_scheme, set_transport_descriptor, Connection, ConnectionOptions, Error, Result,
};
use tracing::debug;

/// Reject options that require capabilities the native transport lacks
///
/// Runs to completion before any registry write; malformed or empty server
/// lists are not its concern and pass through to the engine.
fn check_transport_capabilities(options: &ConnectionOptions) -> Result<()> {
    if has_ws_scheme(options) {
        return Err(Error::invalid_argument(
            "servers",
            "the native client doesn't support websockets, use the 'cirrus-ws' client instead",
        ));
    }
    Ok(())
}

/// Connect to a server using the native TCP/TLS socket transport
///
/// Validates the options against the native transport's capabilities,
/// registers the native transport descriptor for this and subsequent
/// connection attempts, and delegates to [`Connection::connect`], whose
/// outcome is returned unchanged.
///
/// ```rust,no_run
/// use cirrus_client::connect;
/// use cirrus_core::ConnectionOptions;
///
/// # async fn run() -> cirrus_core::Result<()> {
/// let conn = connect(ConnectionOptions::new().server("tls://demo.cirrus.rs")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn connect(options: ConnectionOptions) -> Result<Connection> {
    check_transport_capabilities(&options)?;
    debug!("registering native transport descriptor");
    set_transport_descriptor(native_transport_descriptor());
    Connection::connect(options).await
}
