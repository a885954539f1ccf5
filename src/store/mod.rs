//! Record sink: where finished samples go.
//!
//! The sink is connected once at startup and reused by every tick. Writes
//! are append-only: each sample becomes a new record and nothing is ever
//! updated or deleted.

pub mod mongo;

pub use mongo::MongoSink;

use crate::error::Result;
use crate::metrics::data::HealthSample;

/// Append-only destination for health samples.
pub trait RecordSink {
    /// Write `sample` as a new, uniquely identified record.
    ///
    /// No retries and no buffering: on error the sample is gone from the
    /// store's point of view.
    fn append(&mut self, sample: &HealthSample) -> impl std::future::Future<Output = Result<()>> + Send;
}
