//! The agent loop and its scheduling.

pub mod driver;
pub mod schedule;

// Re-export commonly used items
pub use driver::{Agent, Clock, RunSummary};
pub use schedule::{ticker, Shutdown, Ticker};
