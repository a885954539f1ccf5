//! # Net Agent - Host Health Sampler
//!
//! A small agent that periodically checks network reachability, CPU load and
//! memory load, and appends each sample to a MongoDB collection.
//!
//! ## Features
//!
//! - **Reachability probe**: TCP connect time to a well-known endpoint, no ICMP privileges needed
//! - **Resource sampling**: CPU and memory utilization via sysinfo
//! - **Append-only persistence**: one document per sample, never updated
//! - **Best-effort loop**: a failed tick is logged and the next one runs on schedule
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use net_agent::{ticker, Agent, AgentConfig, MongoSink, StoreConfig, SystemSampler, TcpProber};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::default();
//!     let store = StoreConfig::new("mongodb://localhost:27017");
//!     let sink = MongoSink::connect(&store, &config.node_id).await?;
//!
//!     let (_shutdown, mut ticker) = ticker(config.interval);
//!     let mut agent = Agent::new(config, TcpProber::new(), SystemSampler::new(), sink);
//!     agent.run(&mut ticker).await;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;

// Re-export public API
pub use agent::{ticker, Agent, Clock, RunSummary, Shutdown, Ticker};
pub use config::{redact_uri, AgentConfig, ProbeTarget, StoreConfig};
pub use error::{AgentError, Result};
pub use metrics::{
    data::{HealthSample, LinkStatus, Reachability, ResourceUsage},
    probe::TcpProber,
    sampler::SystemSampler,
    traits::{Prober, ResourceSampler},
};
pub use store::{MongoSink, RecordSink};

/// The default sampling interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// The default reachability target (a public DNS resolver)
pub const DEFAULT_PROBE_HOST: &str = "8.8.8.8";

/// The default reachability port
pub const DEFAULT_PROBE_PORT: u16 = 53;

/// The default probe connection timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// The default node identifier written into every sample
pub const DEFAULT_NODE_ID: &str = "Portfolio-Agent-Local";

/// The default database name
pub const DEFAULT_DATABASE: &str = "portfolio_db";

/// The default collection name
pub const DEFAULT_COLLECTION: &str = "system_health";

/// The default startup connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
