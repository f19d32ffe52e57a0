//! Native DNS resolution for Cirrus
//!
//! Resolution goes through the operating system's resolver via
//! `tokio::net::lookup_host`, so hosts-file overrides and the platform's
//! IPv4/IPv6 ordering conventions apply.

use async_trait::async_trait;
use cirrus_core::transport::DnsResolver;
use cirrus_core::{Error, Result};
use std::net::SocketAddr;

/// DNS resolver backed by the system resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDnsResolver;

impl NativeDnsResolver {
    /// Create a native resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DnsResolver for NativeDnsResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| Error::dns(host, e.to_string()))?
            .collect();
        if addrs.is_empty() {
            return Err(Error::dns(host, "no addresses returned"));
        }
        Ok(addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_localhost() {
        let addrs = NativeDnsResolver::new().resolve("localhost", 4870).await.unwrap();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.port() == 4870));
        assert!(addrs.iter().any(|a| a.ip().is_loopback()));
    }

    #[tokio::test]
    async fn test_resolve_failure_names_host() {
        let err = NativeDnsResolver::new()
            .resolve("no-such-host.invalid", 4870)
            .await
            .unwrap_err();
        match err {
            Error::Dns { host, .. } => assert_eq!(host, "no-such-host.invalid"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
