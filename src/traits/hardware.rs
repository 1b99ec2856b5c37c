use crate::error::Result;
use crate::load::{AvgStat, MiscStat};
use async_trait::async_trait;

/// Trait for monitoring system load
///
/// # Examples
///
/// ```rust
/// use load_average::traits::SystemLoadMonitor;
/// use load_average::load::{AvgStat, MiscStat};
/// use load_average::Result;
///
/// struct IdleSystem;
///
/// #[async_trait::async_trait]
/// impl SystemLoadMonitor for IdleSystem {
///     async fn load_average_1(&self) -> Result<f64> { Ok(0.0) }
///     async fn load_average_5(&self) -> Result<f64> { Ok(0.0) }
///     async fn load_average_15(&self) -> Result<f64> { Ok(0.0) }
///     async fn load_averages(&self) -> Result<AvgStat> { Ok(AvgStat::default()) }
///     async fn misc(&self) -> Result<MiscStat> { Ok(MiscStat::default()) }
/// }
/// ```
#[async_trait]
pub trait SystemLoadMonitor: Send + Sync {
    /// Get the system load average for 1 minute
    async fn load_average_1(&self) -> Result<f64>;
    /// Get the system load average for 5 minutes
    async fn load_average_5(&self) -> Result<f64>;
    /// Get the system load average for 15 minutes
    async fn load_average_15(&self) -> Result<f64>;
    /// Get all three load averages at once
    async fn load_averages(&self) -> Result<AvgStat>;
    /// Get process and context switch statistics
    async fn misc(&self) -> Result<MiscStat>;
}
