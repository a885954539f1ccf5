//! CPU and memory sampling backed by sysinfo.

use crate::error::{AgentError, Result};
use crate::metrics::data::ResourceUsage;
use crate::metrics::traits::ResourceSampler;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tracing::debug;

/// Resource sampler reading the host through [`sysinfo::System`].
///
/// CPU usage is a delta between two refreshes, so the sampler keeps its
/// `System` across ticks.
pub struct SystemSampler {
    system: System,
    primed: bool,
}

impl SystemSampler {
    /// Create a new sampler. Call [`ResourceSampler::prime`] before sampling.
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::new().with_ram()),
        );
        Self {
            system,
            primed: false,
        }
    }

    /// Whether the CPU baseline has been taken.
    pub fn is_primed(&self) -> bool {
        self.primed
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for SystemSampler {
    fn prime(&mut self) -> Result<()> {
        self.system.refresh_cpu_usage();
        if self.system.cpus().is_empty() {
            return Err(AgentError::sample_error("No CPU information available"));
        }
        self.primed = true;
        debug!("CPU baseline taken over {} cores", self.system.cpus().len());
        Ok(())
    }

    fn sample(&mut self) -> Result<ResourceUsage> {
        if !self.primed {
            debug!("Sampling before prime; first CPU reading covers process lifetime");
        }
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let usages: Vec<f32> = self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect();
        let cpu = cpu_percent(&usages)?;
        let ram = memory_percent(self.system.total_memory(), self.system.available_memory())?;

        Ok(ResourceUsage::new(cpu, ram))
    }
}

/// Average per-core usage into one whole percentage.
pub fn cpu_percent(core_usage: &[f32]) -> Result<u8> {
    if core_usage.is_empty() {
        return Err(AgentError::sample_error("No CPU information available"));
    }
    let average = core_usage.iter().sum::<f32>() / core_usage.len() as f32;
    Ok(ResourceUsage::percent_from_f32(average))
}

/// Share of memory not available to new allocations, as a whole percentage.
pub fn memory_percent(total_bytes: u64, available_bytes: u64) -> Result<u8> {
    if total_bytes == 0 {
        return Err(AgentError::sample_error("Total memory reported as zero"));
    }
    let used = total_bytes.saturating_sub(available_bytes);
    Ok(ResourceUsage::percent_from_f32(
        (used as f64 / total_bytes as f64 * 100.0) as f32,
    ))
}
