//! The sampling loop.

use crate::agent::schedule::Ticker;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::metrics::data::{HealthSample, LinkStatus};
use crate::metrics::traits::{Prober, ResourceSampler};
use crate::store::RecordSink;
use chrono::{DateTime, Local};
use tracing::{error, info, warn};

/// Tick counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks started
    pub ticks: u64,
    /// Samples the sink accepted
    pub persisted: u64,
    /// Ticks that ended in an error
    pub failed: u64,
}

/// Source of sample timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Runs probe, sample and persist once per tick.
///
/// Each stage is injected so the loop can be driven with fakes.
pub struct Agent<P, S, K> {
    config: AgentConfig,
    prober: P,
    sampler: S,
    sink: K,
    clock: Clock,
}

impl<P, S, K> Agent<P, S, K>
where
    P: Prober,
    S: ResourceSampler,
    K: RecordSink,
{
    pub fn new(config: AgentConfig, prober: P, sampler: S, sink: K) -> Self {
        Self {
            config,
            prober,
            sampler,
            sink,
            clock: Box::new(Local::now),
        }
    }

    /// Stamp samples with `clock` instead of the local wall clock.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Take the CPU baseline. [`Agent::run`] does this before its first tick.
    pub fn prime(&mut self) -> Result<()> {
        self.sampler.prime()
    }

    /// Run one tick: probe, sample, assemble and persist.
    ///
    /// Returns the persisted sample. A sampling or persistence error drops
    /// the sample for this tick.
    pub async fn tick(&mut self) -> Result<HealthSample> {
        let reachability = self.prober.probe(&self.config.probe).await;
        let usage = self.sampler.sample()?;

        let sample = HealthSample::at(
            (self.clock)(),
            reachability,
            usage,
            self.config.node_id.as_str(),
        );
        self.sink.append(&sample).await?;

        Ok(sample)
    }

    /// Tick until `ticker` is cancelled, sleeping one period after each tick.
    ///
    /// Tick errors are logged and never stop the loop.
    pub async fn run(&mut self, ticker: &mut Ticker) -> RunSummary {
        if let Err(err) = self.prime() {
            warn!("CPU baseline unavailable: {}", err);
        }

        let mut summary = RunSummary::default();
        while !ticker.is_cancelled() {
            summary.ticks += 1;
            match self.tick().await {
                Ok(sample) => {
                    summary.persisted += 1;
                    log_sample(&sample);
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(stage = err.stage(), "❌ Error in tick: {}", err);
                }
            }

            if !ticker.wait().await {
                break;
            }
        }

        info!(
            ticks = summary.ticks,
            persisted = summary.persisted,
            failed = summary.failed,
            "Sampling loop stopped"
        );
        summary
    }
}

fn log_sample(sample: &HealthSample) {
    match sample.status() {
        LinkStatus::Online => info!("🚀 {} | Data pushed to store.", sample.summary()),
        LinkStatus::Offline => warn!("⚠️ {} | Data pushed to store.", sample.summary()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::schedule::ticker;
    use crate::config::ProbeTarget;
    use crate::error::AgentError;
    use crate::metrics::data::{Reachability, ResourceUsage};
    use std::time::Duration;

    struct FixedProber(Reachability);

    impl Prober for FixedProber {
        async fn probe(&self, _target: &ProbeTarget) -> Reachability {
            self.0
        }
    }

    #[derive(Default)]
    struct CountingSampler {
        primed: bool,
        calls: u32,
    }

    impl ResourceSampler for CountingSampler {
        fn prime(&mut self) -> Result<()> {
            self.primed = true;
            Ok(())
        }

        fn sample(&mut self) -> Result<ResourceUsage> {
            self.calls += 1;
            Ok(ResourceUsage::new(10, 20))
        }
    }

    #[derive(Default)]
    struct VecSink {
        samples: Vec<HealthSample>,
        reject: bool,
    }

    impl RecordSink for VecSink {
        async fn append(&mut self, sample: &HealthSample) -> Result<()> {
            if self.reject {
                return Err(AgentError::persist_error("store unavailable"));
            }
            self.samples.push(sample.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_tick_assembles_sample() {
        let config = AgentConfig::default().with_node_id("unit-node");
        let mut agent = Agent::new(
            config,
            FixedProber(Reachability::online(Duration::from_millis(7))),
            CountingSampler::default(),
            VecSink::default(),
        );

        let sample = agent.tick().await.unwrap();
        assert_eq!(sample.status(), LinkStatus::Online);
        assert_eq!(sample.latency_ms(), 7);
        assert_eq!(sample.cpu_percent(), 10);
        assert_eq!(sample.ram_percent(), 20);
        assert_eq!(sample.node_id(), "unit-node");
        assert_eq!(agent.sink().samples, vec![sample]);
    }

    #[tokio::test]
    async fn test_tick_surfaces_persist_error() {
        let sink = VecSink {
            reject: true,
            ..Default::default()
        };
        let mut agent = Agent::new(
            AgentConfig::default(),
            FixedProber(Reachability::offline()),
            CountingSampler::default(),
            sink,
        );

        let err = agent.tick().await.unwrap_err();
        assert_eq!(err.stage(), "persist");
        assert!(agent.sink().samples.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_primes_before_first_tick() {
        let (shutdown, mut ticker) = ticker(Duration::from_secs(10));
        let mut agent = Agent::new(
            AgentConfig::default(),
            FixedProber(Reachability::offline()),
            CountingSampler::default(),
            VecSink::default(),
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            shutdown.trigger();
        });

        let summary = agent.run(&mut ticker).await;
        assert!(agent.sampler.primed);
        assert_eq!(agent.sampler.calls, 1);
        assert_eq!(
            summary,
            RunSummary {
                ticks: 1,
                persisted: 1,
                failed: 0
            }
        );
    }
}
