use serde::Serialize;
use std::collections::BTreeMap;

pub const ACTIVE_BYTES: &str = "active_bytes";
pub const INACTIVE_BYTES: &str = "inactive_bytes";
pub const WIRED_BYTES_TOTAL: &str = "wired_bytes_total";
pub const FREE_BYTES: &str = "free_bytes";
/// Reported in bytes (pageins times page size), not pages.
pub const SWAPPED_IN_PAGES_TOTAL: &str = "swapped_in_pages_total";
/// Reported in bytes (pageouts times page size), not pages.
pub const SWAPPED_OUT_PAGES_TOTAL: &str = "swapped_out_pages_total";
pub const TOTAL_BYTES: &str = "total_bytes";
pub const AVAILABLE_BYTES: &str = "available_bytes";

pub const METRIC_NAMES: [&str; 8] = [
    ACTIVE_BYTES,
    INACTIVE_BYTES,
    WIRED_BYTES_TOTAL,
    FREE_BYTES,
    SWAPPED_IN_PAGES_TOTAL,
    SWAPPED_OUT_PAGES_TOTAL,
    TOTAL_BYTES,
    AVAILABLE_BYTES,
];

/// Metric name to value, one per collection.
pub type MetricSnapshot = BTreeMap<String, f64>;

/// Page counters from a single `host_statistics` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmCounters {
    pub free_count: u32,
    pub active_count: u32,
    pub inactive_count: u32,
    pub wire_count: u32,
    #[allow(dead_code)]
    pub zero_fill_count: u32,
    #[allow(dead_code)]
    pub reactivations: u32,
    pub pageins: u32,
    pub pageouts: u32,
    pub purgeable_count: u32,
}

impl VmCounters {
    /// Free, inactive and purgeable pages together.
    pub fn available_pages(&self) -> u64 {
        self.free_count as u64 + self.inactive_count as u64 + self.purgeable_count as u64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub active_bytes: u64,
    pub inactive_bytes: u64,
    pub wired_bytes: u64,
    pub free_bytes: u64,
    pub swapped_in_bytes: u64,
    pub swapped_out_bytes: u64,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryStats {
    pub fn from_counters(vm: &VmCounters, page_size: u64, total_bytes: u64) -> Self {
        let bytes = |pages: u64| pages.saturating_mul(page_size);
        Self {
            active_bytes: bytes(vm.active_count as u64),
            inactive_bytes: bytes(vm.inactive_count as u64),
            wired_bytes: bytes(vm.wire_count as u64),
            free_bytes: bytes(vm.free_count as u64),
            swapped_in_bytes: bytes(vm.pageins as u64),
            swapped_out_bytes: bytes(vm.pageouts as u64),
            total_bytes,
            available_bytes: bytes(vm.available_pages()),
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        let values = [
            self.active_bytes,
            self.inactive_bytes,
            self.wired_bytes,
            self.free_bytes,
            self.swapped_in_bytes,
            self.swapped_out_bytes,
            self.total_bytes,
            self.available_bytes,
        ];
        METRIC_NAMES
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_has_every_metric_once() {
        let snapshot = MemoryStats::default().snapshot();
        assert_eq!(snapshot.len(), METRIC_NAMES.len());
        for name in METRIC_NAMES {
            assert!(snapshot.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_available_pages_does_not_wrap() {
        let vm = VmCounters {
            free_count: u32::MAX,
            inactive_count: u32::MAX,
            purgeable_count: u32::MAX,
            ..Default::default()
        };
        assert_eq!(vm.available_pages(), 3 * u32::MAX as u64);
    }

    #[test]
    fn test_total_is_not_scaled_by_page_size() {
        let stats = MemoryStats::from_counters(&VmCounters::default(), 16384, 8 << 30);
        assert_eq!(stats.total_bytes, 8 << 30);
        assert_eq!(stats.available_bytes, 0);
    }
}
