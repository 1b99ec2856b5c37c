// Traits module
//
// Monitor traits shared by the sampler and any alternative load sources.

pub mod hardware;

pub use hardware::SystemLoadMonitor;
