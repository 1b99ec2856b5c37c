use std::time::Duration;

/// Default period between two load counter samples
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_secs(5);

/// Longest accepted sampling period; it may not exceed the shortest window
pub const MAX_SAMPLING_INTERVAL: Duration = Duration::from_secs(60);

/// Smoothing windows for the 1, 5 and 15 minute load averages
pub const LOAD_WINDOWS: [Duration; 3] = [Duration::from_secs(60), Duration::from_secs(300), Duration::from_secs(900)];

/// Value folded into the averages when a counter read fails
pub const FAILED_READ_VALUE: f64 = 0.0;

/// Kernel statistics file providing the run-queue counters on Linux
pub const PROC_STAT_PATH: &str = "/proc/stat";

/// Name of the OS thread running the sampling task
pub const SAMPLER_THREAD_NAME: &str = "load-sampler";
