//! Traits for the sampling stages.
//!
//! The driver only talks to these, so tests can swap in fakes for the
//! network and the OS.

use crate::config::ProbeTarget;
use crate::error::Result;
use crate::metrics::data::{Reachability, ResourceUsage};

/// Checks whether a target accepts connections and how long that takes.
pub trait Prober {
    /// Probe `target` once.
    ///
    /// Never fails: any I/O error or timeout is reported as
    /// [`Reachability::offline`].
    fn probe(&self, target: &ProbeTarget) -> impl std::future::Future<Output = Reachability> + Send;
}

/// Reads current CPU and memory utilization.
pub trait ResourceSampler {
    /// Take the baseline CPU reading.
    ///
    /// Called once before the first tick so the first real sample covers the
    /// time since this call rather than since process start.
    fn prime(&mut self) -> Result<()>;

    /// Read utilization since the previous call.
    fn sample(&mut self) -> Result<ResourceUsage>;
}
