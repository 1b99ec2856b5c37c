//! Instantaneous load counters
//!
//! A [`CounterProvider`] acquires a platform [`LoadCounter`] once; the sampler
//! then reads it on every tick. Acquisition failure is permanent for the
//! sampler that attempted it.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};

#[cfg(target_os = "linux")]
use super::constants::PROC_STAT_PATH;

/// An acquired source of the instantaneous processor queue length
///
/// The counter is released when dropped.
#[cfg_attr(test, automock)]
pub trait LoadCounter: Send {
    /// Reads the number of tasks currently running or waiting for a processor
    fn read(&mut self) -> Result<f64>;
}

/// Acquires a [`LoadCounter`]
///
/// `Ok(None)` means the platform has no usable counter and is treated like a
/// failed acquisition.
#[cfg_attr(test, automock)]
pub trait CounterProvider: Send + Sync {
    fn acquire(&self) -> Result<Option<Box<dyn LoadCounter>>>;
}

/// Provider for the counter of the running operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCounterProvider;

impl CounterProvider for SystemCounterProvider {
    #[cfg(target_os = "linux")]
    fn acquire(&self) -> Result<Option<Box<dyn LoadCounter>>> {
        let counter = ProcStatCounter::open(PROC_STAT_PATH)?;
        Ok(Some(Box::new(counter)))
    }

    #[cfg(not(target_os = "linux"))]
    fn acquire(&self) -> Result<Option<Box<dyn LoadCounter>>> {
        Err(Error::counter_unavailable(format!(
            "no run-queue counter on {}",
            std::env::consts::OS
        )))
    }
}

/// Run-queue counter backed by a `/proc/stat` style file
///
/// Reports `procs_running + procs_blocked`, the task population the kernel's
/// own load average counts. The file stays open until the counter is dropped.
#[derive(Debug)]
pub struct ProcStatCounter {
    path: PathBuf,
    file: File,
    buf: String,
}

impl ProcStatCounter {
    /// Opens the statistics file and validates it with one read
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|e| Error::counter_unavailable(format!("{}: {}", path.display(), e)))?;

        let mut counter = Self { path, file, buf: String::new() };
        counter
            .read()
            .map_err(|e| Error::counter_unavailable(format!("{}: {}", counter.path.display(), e)))?;
        Ok(counter)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LoadCounter for ProcStatCounter {
    fn read(&mut self) -> Result<f64> {
        self.buf.clear();
        self.file.seek(SeekFrom::Start(0)).map_err(|e| Error::sample_read(e.to_string()))?;
        self.file.read_to_string(&mut self.buf).map_err(|e| Error::sample_read(e.to_string()))?;
        parse_run_queue(&self.buf)
    }
}

/// Extracts `procs_running + procs_blocked` from `/proc/stat` contents
pub(crate) fn parse_run_queue(stat: &str) -> Result<f64> {
    let mut running = None;
    let mut blocked = None;

    for line in stat.lines() {
        let mut fields = line.split_whitespace();
        let slot = match fields.next() {
            Some("procs_running") => &mut running,
            Some("procs_blocked") => &mut blocked,
            _ => continue,
        };
        let value = fields
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| Error::sample_read(format!("malformed line: {line}")))?;
        *slot = Some(value);
    }

    match (running, blocked) {
        (Some(running), Some(blocked)) => Ok((running + blocked) as f64),
        _ => Err(Error::sample_read("procs_running or procs_blocked missing")),
    }
}
