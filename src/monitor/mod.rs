pub mod host;
#[cfg(target_os = "macos")]
mod mach;
mod memory;

pub use host::{HostQuery, SystemHost};
pub use memory::{MemoryObserver, TracingObserver};

use crate::error::CollectError;
use crate::model::MemoryStats;

/// Memory collector bound to a host and a diagnostic observer.
///
/// `poll` keeps no state between calls, so one monitor can be shared by
/// concurrent callers.
pub struct MemoryMonitor<H = SystemHost> {
    host: H,
    observer: Box<dyn MemoryObserver>,
}

impl MemoryMonitor<SystemHost> {
    pub fn new() -> Self {
        Self::with_host(SystemHost::new(), TracingObserver)
    }
}

impl<H: HostQuery> MemoryMonitor<H> {
    pub fn with_host(host: H, observer: impl MemoryObserver + 'static) -> Self {
        Self {
            host,
            observer: Box::new(observer),
        }
    }

    pub fn poll(&self) -> Result<MemoryStats, CollectError> {
        memory::collect(&self.host, self.observer.as_ref())
    }
}
