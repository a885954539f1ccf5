//! Fake stages shared by the integration tests.

#![allow(dead_code)]

use net_agent::{
    AgentError, HealthSample, ProbeTarget, Prober, Reachability, RecordSink, ResourceSampler,
    ResourceUsage, Result,
};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Prober that replays a script of results, then repeats the last one.
pub struct ScriptedProber {
    script: Mutex<VecDeque<Reachability>>,
    last: Mutex<Reachability>,
}

impl ScriptedProber {
    pub fn new(script: impl IntoIterator<Item = Reachability>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(Reachability::offline()),
        }
    }

    pub fn always(reach: Reachability) -> Self {
        Self::new([reach])
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, _target: &ProbeTarget) -> Reachability {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        *last
    }
}

/// Sampler returning fixed values, optionally failing on chosen calls.
#[derive(Default)]
pub struct FakeSampler {
    pub usage: Option<ResourceUsage>,
    pub fail_on: Vec<u32>,
    pub fail_prime: bool,
    pub calls: u32,
    pub primed: bool,
}

impl FakeSampler {
    pub fn with_usage(cpu: u8, ram: u8) -> Self {
        Self {
            usage: Some(ResourceUsage::new(cpu, ram)),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, calls: &[u32]) -> Self {
        self.fail_on = calls.to_vec();
        self
    }

    pub fn without_baseline(mut self) -> Self {
        self.fail_prime = true;
        self
    }
}

impl ResourceSampler for FakeSampler {
    fn prime(&mut self) -> Result<()> {
        if self.fail_prime {
            return Err(AgentError::sample_error("No CPU information available"));
        }
        self.primed = true;
        Ok(())
    }

    fn sample(&mut self) -> Result<ResourceUsage> {
        self.calls += 1;
        if self.fail_on.contains(&self.calls) {
            return Err(AgentError::sample_error("sensor read failed"));
        }
        Ok(self.usage.unwrap_or_else(|| ResourceUsage::new(0, 0)))
    }
}

/// A sample as the fake store saw it, with the (paused) clock at write time.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub sample: HealthSample,
    pub at: Instant,
}

/// In-memory append-only store. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<StoredRecord>>>,
    attempts: Arc<Mutex<u32>>,
    fail_on: Arc<Vec<u32>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given append attempts (1-based).
    pub fn failing_on(calls: &[u32]) -> Self {
        Self {
            fail_on: Arc::new(calls.to_vec()),
            ..Default::default()
        }
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }
}

impl RecordSink for MemorySink {
    async fn append(&mut self, sample: &HealthSample) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if self.fail_on.contains(&attempt) {
            return Err(AgentError::persist_error("network partition"));
        }
        self.records.lock().unwrap().push(StoredRecord {
            sample: sample.clone(),
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Local time that advances with the tokio clock, so paused-time tests get
/// timestamps as far apart as their ticks.
pub fn paused_clock() -> impl Fn() -> DateTime<Local> + Send + Sync + 'static {
    let base = Local::now();
    let start = Instant::now();
    move || base + chrono::Duration::from_std(start.elapsed()).unwrap_or_else(|_| chrono::Duration::zero())
}
