use super::host::{total_memory, HostQuery};
use crate::error::CollectError;
use crate::model::MemoryStats;

const GIB: f64 = 1_073_741_824.0;

/// Receives the one diagnostic observation a successful collection makes.
pub trait MemoryObserver: Send + Sync {
    fn available(&self, bytes: u64);
}

/// Logs available memory at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MemoryObserver for TracingObserver {
    fn available(&self, bytes: u64) {
        tracing::debug!("darwin mem available: {:.3} Gig", bytes as f64 / GIB);
    }
}

/// Takes one point-in-time memory reading. Nothing is returned unless both
/// the VM counters and the physical memory size were read.
pub fn collect<H, O>(host: &H, observer: &O) -> Result<MemoryStats, CollectError>
where
    H: HostQuery + ?Sized,
    O: MemoryObserver + ?Sized,
{
    let vm = host.vm_statistics()?;
    let total = total_memory(host)?;
    let page_size = host.page_size();

    let stats = MemoryStats::from_counters(&vm, page_size, total);
    observer.available(stats.available_bytes);
    Ok(stats)
}
