use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// System load averages over 1, 5 and 15 minutes
///
/// All three values are `0.0` until the sampler has completed its first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvgStat {
    /// 1 minute load average
    pub load1: f64,
    /// 5 minute load average
    pub load5: f64,
    /// 15 minute load average
    pub load15: f64,
}

impl AvgStat {
    pub fn new(load1: f64, load5: f64, load15: f64) -> Self {
        Self { load1, load5, load15 }
    }

    /// Returns the averages ordered by window length
    pub fn as_array(&self) -> [f64; 3] {
        [self.load1, self.load5, self.load15]
    }

    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(|v| *v == 0.0)
    }
}

impl fmt::Display for AvgStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Miscellaneous process statistics
///
/// No platform backend fills this in yet; see [`LoadAverageSampler::misc`](super::LoadAverageSampler::misc).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscStat {
    pub procs_total: i64,
    pub procs_created: i64,
    pub procs_running: i64,
    pub procs_blocked: i64,
    pub ctxt: i64,
}

impl fmt::Display for MiscStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Copy of the sampler state taken under its read lock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSnapshot {
    /// Smoothed load averages
    pub load: AvgStat,
    /// Error reported by the most recent sampling tick, if it failed
    pub last_error: Option<Error>,
    /// Number of completed sampling ticks, failed ones included
    pub samples: u64,
}

impl LoadSnapshot {
    /// Whether at least one sampling tick has completed
    pub fn is_sampled(&self) -> bool {
        self.samples > 0
    }

    /// Converts the snapshot into the averages, or the last tick's error
    pub fn into_result(self) -> Result<AvgStat> {
        match self.last_error {
            Some(err) => Err(err),
            None => Ok(self.load),
        }
    }
}
