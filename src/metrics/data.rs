//! Data structures for health samples.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reachability of the probe target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkStatus {
    Online,
    Offline,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Online => "ONLINE",
            LinkStatus::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one reachability probe.
///
/// Latency is always 0 when offline; the constructors are the only way to
/// build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    status: LinkStatus,
    latency_ms: u32,
}

impl Reachability {
    /// Connection established after `elapsed`. Milliseconds are truncated.
    pub fn online(elapsed: Duration) -> Self {
        Self {
            status: LinkStatus::Online,
            latency_ms: u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX),
        }
    }

    /// Connection failed or timed out.
    pub fn offline() -> Self {
        Self {
            status: LinkStatus::Offline,
            latency_ms: 0,
        }
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    pub fn is_online(&self) -> bool {
        self.status == LinkStatus::Online
    }
}

/// CPU and memory utilization, whole percent in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    cpu_percent: u8,
    ram_percent: u8,
}

impl ResourceUsage {
    /// Values above 100 are clamped.
    pub fn new(cpu_percent: u8, ram_percent: u8) -> Self {
        Self {
            cpu_percent: cpu_percent.min(100),
            ram_percent: ram_percent.min(100),
        }
    }

    /// Truncate a floating point percentage into `[0, 100]`. NaN maps to 0.
    pub fn percent_from_f32(value: f32) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.clamp(0.0, 100.0) as u8
    }

    pub fn cpu_percent(&self) -> u8 {
        self.cpu_percent
    }

    pub fn ram_percent(&self) -> u8 {
        self.ram_percent
    }
}

/// One persisted health record.
///
/// Immutable once built. Field names on the wire are the short names the
/// `system_health` collection has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// When the sample was assembled, RFC 3339 with local offset
    timestamp: DateTime<Local>,
    /// Probe result
    status: LinkStatus,
    /// Connect time in milliseconds, 0 when offline
    #[serde(rename = "latency")]
    latency_ms: u32,
    /// CPU utilization percent
    #[serde(rename = "cpu")]
    cpu_percent: u8,
    /// Memory utilization percent
    #[serde(rename = "ram")]
    ram_percent: u8,
    /// Originating agent
    #[serde(rename = "node")]
    node_id: String,
}

impl HealthSample {
    /// Assemble a sample stamped with the current local time.
    pub fn new(reachability: Reachability, usage: ResourceUsage, node_id: impl Into<String>) -> Self {
        Self::at(Local::now(), reachability, usage, node_id)
    }

    /// Assemble a sample with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Local>,
        reachability: Reachability,
        usage: ResourceUsage,
        node_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            status: reachability.status(),
            latency_ms: reachability.latency_ms(),
            cpu_percent: usage.cpu_percent(),
            ram_percent: usage.ram_percent(),
            node_id: node_id.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    pub fn cpu_percent(&self) -> u8 {
        self.cpu_percent
    }

    pub fn ram_percent(&self) -> u8 {
        self.ram_percent
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        format!(
            "[{}] Latency: {}ms | CPU: {}% | RAM: {}%",
            self.status, self.latency_ms, self.cpu_percent, self.ram_percent
        )
    }
}
