//! System load average sampling
//!
//! This module maintains the classic 1, 5 and 15 minute load averages by
//! sampling an instantaneous run-queue counter in the background and smoothing
//! it with exponential moving averages.
//!
//! # Features
//!
//! - Lazily started background sampler, launched exactly once per sampler
//! - Lock-protected snapshots that never wait for a sample
//! - Graceful degradation when no counter can be acquired
//! - Cancellation through [`CancellationToken`] or [`LoadAverageSampler::shutdown`]
//!
//! # Examples
//!
//! Using the process-wide sampler:
//!
//! ```no_run
//! use load_average::load;
//!
//! fn main() -> load_average::Result<()> {
//!     // The first call starts sampling and may report zeros.
//!     let _ = load::avg()?;
//!
//!     std::thread::sleep(std::time::Duration::from_secs(6));
//!     println!("{}", load::avg()?);
//!     Ok(())
//! }
//! ```
//!
//! Averages stay at zero for the first sampling interval; check
//! [`LoadSnapshot::samples`] to tell startup apart from an idle system.

/// Load sampling constants
pub mod constants;

/// Counter acquisition and platform counters
pub mod counter;

/// Background sampler and smoothing
pub mod sampler;

/// Load data types
pub mod types;


pub use counter::{CounterProvider, LoadCounter, ProcStatCounter, SystemCounterProvider};
pub use sampler::{LoadAverageSampler, SamplerConfig, Smoothing};
pub use types::{AvgStat, LoadSnapshot, MiscStat};

use once_cell::sync::Lazy;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

static DEFAULT_SAMPLER: Lazy<LoadAverageSampler> = Lazy::new(LoadAverageSampler::system);

/// The process-wide sampler over the system counter
///
/// It runs on its own thread until the process exits or
/// [`shutdown`](LoadAverageSampler::shutdown) is called on it.
pub fn default_sampler() -> &'static LoadAverageSampler {
    &DEFAULT_SAMPLER
}

/// Load averages from the process-wide sampler
///
/// May return zero values for the first few seconds after the first call.
pub fn avg() -> Result<AvgStat> {
    DEFAULT_SAMPLER.avg()
}

/// Like [`avg`], but a first call ties the process-wide sampler to `cancel`
pub fn avg_with_cancel(cancel: &CancellationToken) -> Result<AvgStat> {
    DEFAULT_SAMPLER.avg_with_cancel(cancel)
}

pub fn misc() -> Result<MiscStat> {
    DEFAULT_SAMPLER.misc()
}

pub fn misc_with_cancel(cancel: &CancellationToken) -> Result<MiscStat> {
    DEFAULT_SAMPLER.misc_with_cancel(cancel)
}
