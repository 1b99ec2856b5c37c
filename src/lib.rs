//! Load Average - A Rust library maintaining system load averages
//!
//! This crate keeps the classic 1, 5 and 15 minute load averages for systems
//! that only expose an instantaneous run-queue length. A background task
//! samples the counter every few seconds and folds each reading into three
//! exponential moving averages, which callers read through a lock-protected
//! snapshot.
//!
//! # Features
//!
//! - **Lazy startup**: the sampling task starts on the first read, exactly once
//! - **Non-blocking reads**: snapshots never wait for a sample
//! - **Graceful degradation**: a missing counter leaves the averages at zero
//! - **Cancellation**: tie the sampler to a `CancellationToken` or shut it down
//! - **Pluggable counters**: inject any [`CounterProvider`](load::CounterProvider)
//!
//! # Examples
//!
//! ```no_run
//! use load_average::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // The first call starts the process-wide sampler.
//!     let load = load_average::load::avg()?;
//!     println!("load average: {}", load);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Sampling runs in the background, so counter errors are never raised at the
//! point of failure. The error of the most recent tick is kept and returned by
//! the next read:
//!
//! ```rust
//! use load_average::{Error, Result};
//!
//! fn example() -> Result<()> {
//!     if true {
//!         return Err(Error::NotImplemented("misc".to_string()));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Thread Safety
//!
//! [`LoadAverageSampler`](load::LoadAverageSampler) is `Send` and `Sync` and
//! is meant to be shared. Sampling runs on its own thread by default, so it
//! keeps going after the runtime of the first caller shuts down.

#![doc(html_root_url = "https://docs.rs/load-average/0.1.0")]

pub mod error;
pub mod load;
pub mod traits;

pub use error::{Error, Result};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::load::{
        AvgStat, CounterProvider, LoadAverageSampler, LoadCounter, LoadSnapshot, MiscStat, SamplerConfig,
        SystemCounterProvider,
    };
    pub use crate::traits::SystemLoadMonitor;
    pub use crate::Error;
    pub use crate::Result;
}
