//! TCP reachability probe.
//!
//! Opening a TCP connection stands in for an ICMP echo: it needs no raw
//! socket privileges and works the same on every platform.

use crate::config::ProbeTarget;
use crate::error::{AgentError, Result};
use crate::metrics::data::Reachability;
use crate::metrics::traits::Prober;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use tracing::debug;

/// Prober that connects to the target over TCP and drops the connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl TcpProber {
    pub fn new() -> Self {
        Self
    }

    /// Time a single connection attempt, including name resolution.
    async fn try_connect(target: &ProbeTarget) -> Result<Duration> {
        let started = Instant::now();
        let connect = TcpStream::connect((target.host.as_str(), target.port));

        match time::timeout(target.timeout, connect).await {
            Ok(Ok(_stream)) => Ok(started.elapsed()),
            Ok(Err(err)) => Err(AgentError::probe_error(format!(
                "connect to {} failed: {}",
                target.address(),
                err
            ))),
            Err(_) => Err(AgentError::probe_error(format!(
                "connect to {} timed out after {:?}",
                target.address(),
                target.timeout
            ))),
        }
    }
}

impl Prober for TcpProber {
    async fn probe(&self, target: &ProbeTarget) -> Reachability {
        match Self::try_connect(target).await {
            Ok(elapsed) => Reachability::online(elapsed),
            Err(err) => {
                debug!("{}", err);
                Reachability::offline()
            }
        }
    }
}
