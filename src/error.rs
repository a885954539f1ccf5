//! Error handling for the net agent.

/// A specialized `Result` type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// The main error type for agent operations.
///
/// `Config` and `Connection` only occur at startup and are fatal. `Sample`
/// and `Persist` occur per tick and are logged by the driver, which then
/// carries on. `Probe` never leaves the prober.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The record store could not be reached at startup
    #[error("Store connection error: {0}")]
    Connection(String),

    /// The reachability connection attempt failed
    #[error("Probe error: {0}")]
    Probe(String),

    /// Reading OS resource metrics failed
    #[error("Failed to sample system resources: {0}")]
    Sample(String),

    /// Writing a sample to the store failed
    #[error("Failed to persist sample: {0}")]
    Persist(String),
}

impl AgentError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new store connection error
    pub fn connection_error(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new probe error
    pub fn probe_error(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Create a new sampling error
    pub fn sample_error(msg: impl Into<String>) -> Self {
        Self::Sample(msg.into())
    }

    /// Create a new persistence error
    pub fn persist_error(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Whether this error must stop the process before the loop starts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Connection(_))
    }

    /// Short name of the stage that produced this error, used in tick logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connection(_) => "connect",
            Self::Probe(_) => "probe",
            Self::Sample(_) => "sample",
            Self::Persist(_) => "persist",
        }
    }
}
