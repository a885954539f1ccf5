//! Agent configuration.
//!
//! Read once at startup and never changed afterwards.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the reachability prober connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_PROBE_HOST.to_string(),
            port: crate::DEFAULT_PROBE_PORT,
            timeout: Duration::from_secs(crate::DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl ProbeTarget {
    /// Create a probe target with the default timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the connection timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `host:port` form used in log lines.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Record store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// MongoDB connection string, credentials included
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection that receives one document per sample
    pub collection: String,
    /// Server selection timeout for the startup liveness check. Only applied
    /// when the connection string does not set `serverSelectionTimeoutMS`.
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Create a store configuration with the default database and collection.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: crate::DEFAULT_DATABASE.to_string(),
            collection: crate::DEFAULT_COLLECTION.to_string(),
            connect_timeout: Duration::from_secs(crate::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the startup connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connection target with credentials stripped, safe to print.
    pub fn redacted_uri(&self) -> String {
        redact_uri(&self.uri)
    }
}

/// Everything the driver needs besides its three stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Sleep between ticks
    pub interval: Duration,
    /// Reachability target
    pub probe: ProbeTarget,
    /// Static label written into every sample
    pub node_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::DEFAULT_INTERVAL_SECS),
            probe: ProbeTarget::default(),
            node_id: crate::DEFAULT_NODE_ID.to_string(),
        }
    }
}

impl AgentConfig {
    /// Set the sampling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the reachability target.
    pub fn with_probe(mut self, probe: ProbeTarget) -> Self {
        self.probe = probe;
        self
    }

    /// Set the node identifier.
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(AgentError::config_error("interval must be greater than zero"));
        }
        if self.probe.timeout.is_zero() {
            return Err(AgentError::config_error("probe timeout must be greater than zero"));
        }
        if self.probe.host.trim().is_empty() {
            return Err(AgentError::config_error("probe host must not be empty"));
        }
        if self.node_id.trim().is_empty() {
            return Err(AgentError::config_error("node id must not be empty"));
        }
        Ok(())
    }
}

/// Resolve the store configuration from an optional connection string.
///
/// A missing or blank connection string is a configuration error.
pub fn store_config_from(uri: Option<&str>) -> Result<StoreConfig> {
    match uri.map(str::trim) {
        Some(uri) if !uri.is_empty() => Ok(StoreConfig::new(uri)),
        _ => Err(AgentError::config_error(
            "missing MONGO_URI (set the environment variable or pass --mongo-uri)",
        )),
    }
}

/// Strip the `user:password@` part from a connection string.
///
/// The scheme is kept; everything after the last `@` is kept.
pub fn redact_uri(uri: &str) -> String {
    let (scheme, rest) = match uri.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, uri),
    };
    let host_part = rest.rsplit('@').next().unwrap_or(rest);
    match scheme {
        Some(scheme) => format!("{}://{}", scheme, host_part),
        None => host_part.to_string(),
    }
}
