use std::{io, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::{net::TcpStream, time::timeout};
use tracing::debug;
use url::Url;

use crate::ConnectivityProbe;

/// Considers the device online when a TCP connection to `target` can be
/// opened within the timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    target: String,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Result<Self> {
        let target = target.into();
        let valid = target
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if !valid {
            return Err(anyhow!(
                "connectivity target '{target}' must have the form host:port"
            ));
        }
        Ok(Self { target, timeout })
    }

    /// Probes the host and port the redemption endpoint lives on.
    pub fn for_endpoint(endpoint: &Url, timeout: Duration) -> Result<Self> {
        let host = endpoint
            .host_str()
            .ok_or_else(|| anyhow!("endpoint '{endpoint}' has no host"))?;
        let port = endpoint
            .port_or_known_default()
            .ok_or_else(|| anyhow!("endpoint '{endpoint}' has no known port"))?;
        Self::new(format!("{host}:{port}"), timeout)
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_online(&self) -> Result<bool> {
        match timeout(self.timeout, TcpStream::connect(self.target.as_str())).await {
            Ok(Ok(_stream)) => Ok(true),
            Ok(Err(err)) if err.kind() == io::ErrorKind::InvalidInput => Err(anyhow!(
                "invalid connectivity target '{}': {err}",
                self.target
            )),
            Ok(Err(err)) => {
                debug!(addr = %self.target, "connectivity probe failed: {err}");
                Ok(false)
            }
            Err(_) => {
                debug!(addr = %self.target, "connectivity probe timed out");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/connectivity_tests.rs"]
mod tests;
