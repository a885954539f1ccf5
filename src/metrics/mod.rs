//! Health metrics: the sample data model and the stages that fill it in.
//!
//! A tick needs a reachability result from a [`Prober`] and a
//! [`ResourceUsage`] from a [`ResourceSampler`]; both are combined into a
//! [`HealthSample`].

pub mod data;
pub mod probe;
pub mod sampler;
pub mod traits;

// Re-export commonly used items
pub use data::{HealthSample, LinkStatus, Reachability, ResourceUsage};
pub use probe::TcpProber;
pub use sampler::SystemSampler;
pub use traits::{Prober, ResourceSampler};
