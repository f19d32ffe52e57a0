//! TCP transport implementation for Cirrus
//!
//! This module provides the plain TCP dialing transport used by the native
//! client entry point.

use async_trait::async_trait;
use cirrus_core::options::{ConnectionOptions, ServerAddr};
use cirrus_core::transport::Transport;
use cirrus_core::{Error, Result};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream as TokioTcpStream;

/// Plain TCP transport
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TokioTcpStream>,
    remote_addr: Option<SocketAddr>,
}

impl TcpTransport {
    /// Create an unconnected TCP transport
    pub fn new() -> Self {
        Self {
            stream: None,
            remote_addr: None,
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn dial(
        &mut self,
        _server: &ServerAddr,
        addr: SocketAddr,
        options: &ConnectionOptions,
    ) -> Result<()> {
        let stream = TokioTcpStream::connect(addr).await.map_err(Error::Io)?;
        if options.no_delay {
            stream.set_nodelay(true).map_err(Error::Io)?;
        }
        self.remote_addr = stream.peer_addr().ok();
        self.stream = Some(stream);
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.stream {
            Some(stream) => stream.read(buf).await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match &mut self.stream {
            Some(stream) => stream.write_all(buf).await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn flush(&mut self) -> Result<()> {
        match &mut self.stream {
            Some(stream) => stream.flush().await.map_err(Error::Io),
            None => Err(Error::Connection("transport not connected".to_string())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await.map_err(Error::Io)?;
        }
        Ok(())
    }

    fn is_encrypted(&self) -> bool {
        false
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
