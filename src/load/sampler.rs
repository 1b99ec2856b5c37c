use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use scopeguard::defer;
use tokio::runtime::{Builder, Handle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::constants::{
    DEFAULT_SAMPLING_INTERVAL, FAILED_READ_VALUE, LOAD_WINDOWS, MAX_SAMPLING_INTERVAL, SAMPLER_THREAD_NAME,
};
use super::counter::{CounterProvider, LoadCounter, SystemCounterProvider};
use super::types::{AvgStat, LoadSnapshot, MiscStat};
use crate::error::{Error, Result};
use crate::traits::SystemLoadMonitor;

/// Configuration for load average sampling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Period between two counter samples
    pub interval: Duration,
    /// Fold [`FAILED_READ_VALUE`] into the averages when a read fails
    pub fold_failed_reads: bool,
    /// Run the sampling task on its own OS thread
    ///
    /// When `false` the task is spawned onto the caller's Tokio runtime if one
    /// is active and stops for good when that runtime shuts down.
    pub dedicated_thread: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_SAMPLING_INTERVAL, fold_failed_reads: true, dedicated_thread: true }
    }
}

impl SamplerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_fold_failed_reads(mut self, fold: bool) -> Self {
        self.fold_failed_reads = fold;
        self
    }

    pub fn with_dedicated_thread(mut self, dedicated: bool) -> Self {
        self.dedicated_thread = dedicated;
        self
    }

    /// Checks that the interval is non-zero and no longer than the shortest window
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::invalid_config("sampling interval must be non-zero"));
        }
        if self.interval > MAX_SAMPLING_INTERVAL {
            return Err(Error::invalid_config(format!(
                "sampling interval {:?} exceeds {:?}",
                self.interval, MAX_SAMPLING_INTERVAL
            )));
        }
        Ok(())
    }
}

/// Exponential smoothing factors for the three load windows
///
/// Each factor is `exp(-T / W)` for sampling period `T` and window `W`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    factors: [f64; 3],
}

impl Smoothing {
    pub fn new(interval: Duration) -> Self {
        let period = interval.as_secs_f64();
        Self { factors: LOAD_WINDOWS.map(|window| (-period / window.as_secs_f64()).exp()) }
    }

    /// Factors ordered by window length (1, 5, 15 minutes)
    pub fn factors(&self) -> [f64; 3] {
        self.factors
    }

    /// Folds one instantaneous reading into all three averages
    pub fn apply(&self, load: &mut AvgStat, value: f64) {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let [f1, f5, f15] = self.factors;
        load.load1 = ema(load.load1, value, f1);
        load.load5 = ema(load.load5, value, f5);
        load.load15 = ema(load.load15, value, f15);
    }
}

fn ema(avg: f64, sample: f64, factor: f64) -> f64 {
    avg * factor + sample * (1.0 - factor)
}

#[derive(Debug, Default)]
struct SharedLoad {
    load: AvgStat,
    last_error: Option<Error>,
    samples: u64,
}

/// Background sampler maintaining the 1, 5 and 15 minute load averages
///
/// The sampling task is started lazily by the first read and at most once per
/// sampler, no matter how many threads read concurrently. Reads never wait for
/// a sample: until the first tick completes they report zero averages.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use load_average::load::{LoadAverageSampler, SamplerConfig, SystemCounterProvider};
///
/// #[tokio::main]
/// async fn main() -> load_average::Result<()> {
///     let sampler = LoadAverageSampler::new(Arc::new(SystemCounterProvider), SamplerConfig::default())?;
///     let _ = sampler.snapshot();
///
///     tokio::time::sleep(std::time::Duration::from_secs(6)).await;
///     let load = sampler.avg()?;
///     println!("load average: {:.2} {:.2} {:.2}", load.load1, load.load5, load.load15);
///     Ok(())
/// }
/// ```
pub struct LoadAverageSampler {
    provider: Arc<dyn CounterProvider>,
    config: SamplerConfig,
    smoothing: Smoothing,
    shared: Arc<RwLock<SharedLoad>>,
    started: AtomicBool,
    shutdown: CancellationToken,
}

impl fmt::Debug for LoadAverageSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadAverageSampler")
            .field("config", &self.config)
            .field("started", &self.is_started())
            .field("samples", &self.samples_taken())
            .finish_non_exhaustive()
    }
}

impl LoadAverageSampler {
    /// Creates a sampler reading from `provider`
    ///
    /// Nothing is acquired or spawned until the first read.
    pub fn new(provider: Arc<dyn CounterProvider>, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(provider, config))
    }

    /// Sampler over the operating system's run-queue counter, on its own thread
    pub fn system() -> Self {
        Self::with_valid_config(Arc::new(SystemCounterProvider), SamplerConfig::default())
    }

    fn with_valid_config(provider: Arc<dyn CounterProvider>, config: SamplerConfig) -> Self {
        Self {
            provider,
            smoothing: Smoothing::new(config.interval),
            config,
            shared: Arc::new(RwLock::new(SharedLoad::default())),
            started: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Whether the sampling task has been launched
    ///
    /// Stays `true` after the task exits; a sampler is never restarted.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Number of completed sampling ticks, failed reads included
    pub fn samples_taken(&self) -> u64 {
        self.shared.read().samples
    }

    /// Launches the sampling task unless it was launched before
    ///
    /// `cancel` stops the task when cancelled. Only the call that actually
    /// launches the task returns `true`.
    pub fn ensure_started(&self, cancel: &CancellationToken) -> bool {
        if self.started.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return false;
        }

        let task = SamplingTask {
            provider: Arc::clone(&self.provider),
            shared: Arc::clone(&self.shared),
            smoothing: self.smoothing,
            interval: self.config.interval,
            fold_failed_reads: self.config.fold_failed_reads,
            cancel: cancel.clone(),
            shutdown: self.shutdown.clone(),
        };

        if self.config.dedicated_thread {
            task.spawn_thread();
            return true;
        }
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task.run());
            },
            Err(_) => task.spawn_thread(),
        }
        true
    }

    /// Returns a copy of the current averages and the last tick's error
    ///
    /// Starts the sampler on first use; the task then runs until
    /// [`shutdown`](Self::shutdown) or drop.
    pub fn snapshot(&self) -> LoadSnapshot {
        self.snapshot_with_cancel(&self.shutdown)
    }

    /// Like [`snapshot`](Self::snapshot), but a first call ties the sampling
    /// task to `cancel`
    pub fn snapshot_with_cancel(&self, cancel: &CancellationToken) -> LoadSnapshot {
        self.ensure_started(cancel);
        let shared = self.shared.read();
        LoadSnapshot { load: shared.load, last_error: shared.last_error.clone(), samples: shared.samples }
    }

    /// Current load averages, or the error of the last sampling tick
    ///
    /// May report zeros for the first sampling interval.
    pub fn avg(&self) -> Result<AvgStat> {
        self.snapshot().into_result()
    }

    pub fn avg_with_cancel(&self, cancel: &CancellationToken) -> Result<AvgStat> {
        self.snapshot_with_cancel(cancel).into_result()
    }

    /// Miscellaneous process statistics; not implemented for this counter
    pub fn misc(&self) -> Result<MiscStat> {
        Err(Error::not_implemented("miscellaneous load statistics"))
    }

    pub fn misc_with_cancel(&self, _cancel: &CancellationToken) -> Result<MiscStat> {
        self.misc()
    }

    /// Stops the sampling task; the averages keep their last value
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for LoadAverageSampler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl SystemLoadMonitor for LoadAverageSampler {
    async fn load_average_1(&self) -> Result<f64> {
        Ok(self.avg()?.load1)
    }

    async fn load_average_5(&self) -> Result<f64> {
        Ok(self.avg()?.load5)
    }

    async fn load_average_15(&self) -> Result<f64> {
        Ok(self.avg()?.load15)
    }

    async fn load_averages(&self) -> Result<AvgStat> {
        self.avg()
    }

    async fn misc(&self) -> Result<MiscStat> {
        LoadAverageSampler::misc(self)
    }
}

/// State moved into the background task
struct SamplingTask {
    provider: Arc<dyn CounterProvider>,
    shared: Arc<RwLock<SharedLoad>>,
    smoothing: Smoothing,
    interval: Duration,
    fold_failed_reads: bool,
    cancel: CancellationToken,
    shutdown: CancellationToken,
}

impl SamplingTask {
    fn spawn_thread(self) {
        let spawned = std::thread::Builder::new().name(SAMPLER_THREAD_NAME.to_string()).spawn(move || {
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(self.run()),
                Err(e) => warn!(error = %e, "failed to build load sampler runtime"),
            }
        });
        if let Err(e) = spawned {
            warn!(error = %e, "failed to spawn load sampler thread");
        }
    }

    async fn run(self) {
        debug!(interval = ?self.interval, "load sampler starting");
        defer! {
            debug!("load sampler stopped");
        }

        let Some(mut counter) = self.acquire().await else {
            return;
        };

        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = self.stopped() => break,
                _ = ticker.tick() => {},
            }

            let read = tokio::task::spawn_blocking(move || {
                let reading = counter.read();
                (counter, reading)
            });
            let joined = tokio::select! {
                biased;
                _ = self.stopped() => break,
                joined = read => joined,
            };

            match joined {
                Ok((returned, reading)) => {
                    counter = returned;
                    self.record(reading);
                },
                Err(e) => {
                    warn!(error = %e, "load counter read panicked");
                    break;
                },
            }
        }
    }

    async fn acquire(&self) -> Option<Box<dyn LoadCounter>> {
        let provider = Arc::clone(&self.provider);
        let acquired = tokio::select! {
            biased;
            _ = self.stopped() => return None,
            joined = tokio::task::spawn_blocking(move || provider.acquire()) => joined,
        };

        match acquired {
            Ok(Ok(Some(counter))) => Some(counter),
            Ok(Ok(None)) => {
                debug!("no load counter available, sampling disabled");
                None
            },
            Ok(Err(e)) => {
                debug!(error = %e, "load counter acquisition failed, sampling disabled");
                None
            },
            Err(e) => {
                warn!(error = %e, "load counter acquisition panicked");
                None
            },
        }
    }

    async fn stopped(&self) {
        tokio::select! {
            _ = self.cancel.cancelled() => {},
            _ = self.shutdown.cancelled() => {},
        }
    }

    fn record(&self, reading: Result<f64>) {
        let (value, error) = match reading {
            Ok(value) => (value, None),
            Err(e) => {
                debug!(error = %e, "load counter read failed");
                (FAILED_READ_VALUE, Some(e))
            },
        };
        let fold = error.is_none() || self.fold_failed_reads;

        let mut shared = self.shared.write();
        shared.last_error = error;
        if fold {
            self.smoothing.apply(&mut shared.load, value);
        }
        shared.samples += 1;
        trace!(value, load = %shared.load, samples = shared.samples, "load sampled");
    }
}
