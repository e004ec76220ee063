//! The narrow slice of the host the memory collector reads from.

use crate::error::CollectError;
use crate::model::VmCounters;
use std::io;

pub const MEMSIZE_KEY: &str = "hw.memsize";

/// Host-level queries used by the collector.
///
/// Implementations must not cache VM counters: every call is a fresh kernel
/// query.
pub trait HostQuery: Send + Sync {
    /// One `host_statistics(HOST_VM_INFO)` call.
    fn vm_statistics(&self) -> Result<VmCounters, CollectError>;

    /// Raw bytes of a sysctl value, looked up by name.
    fn sysctl(&self, key: &'static str) -> io::Result<Vec<u8>>;

    /// Bytes per VM page.
    fn page_size(&self) -> u64;
}

/// Total physical memory in bytes.
pub fn total_memory<H: HostQuery + ?Sized>(host: &H) -> Result<u64, CollectError> {
    host.sysctl(MEMSIZE_KEY)
        .and_then(|raw| decode_memsize(&raw))
        .map_err(|source| CollectError::ConfigQuery {
            key: MEMSIZE_KEY,
            source,
        })
}

/// Decodes `hw.memsize` as a little-endian u64.
///
/// Accepts a trailing NUL terminator, and a 7 byte value whose zero high byte
/// was dropped as if it were one.
pub fn decode_memsize(raw: &[u8]) -> io::Result<u64> {
    let value = match raw.len() {
        7 | 8 => raw,
        9 if raw[8] == 0 => &raw[..8],
        len => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected an 8 byte integer, got {} bytes", len),
            ))
        }
    };
    let mut buf = [0u8; 8];
    buf[..value.len()].copy_from_slice(value);
    Ok(u64::from_le_bytes(buf))
}

#[cfg(target_os = "macos")]
pub type SystemHost = super::mach::MachHost;

#[cfg(not(target_os = "macos"))]
pub type SystemHost = UnsupportedHost;

/// Stand-in for targets without the mach host interface.
#[cfg(not(target_os = "macos"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedHost;

#[cfg(not(target_os = "macos"))]
impl UnsupportedHost {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "macos"))]
impl HostQuery for UnsupportedHost {
    fn vm_statistics(&self) -> Result<VmCounters, CollectError> {
        Err(CollectError::Unsupported)
    }

    fn sysctl(&self, key: &'static str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("sysctl {} is not available on this platform", key),
        ))
    }

    fn page_size(&self) -> u64 {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIXTEEN_GIB: u64 = 17_179_869_184;

    #[test]
    fn test_decode_exact_width() {
        assert_eq!(decode_memsize(&SIXTEEN_GIB.to_le_bytes()).unwrap(), SIXTEEN_GIB);
    }

    #[test]
    fn test_decode_with_trailing_nul() {
        let mut raw = SIXTEEN_GIB.to_le_bytes().to_vec();
        raw.push(0);
        assert_eq!(decode_memsize(&raw).unwrap(), SIXTEEN_GIB);
    }

    #[test]
    fn test_decode_with_stripped_high_byte() {
        let raw = &SIXTEEN_GIB.to_le_bytes()[..7];
        assert_eq!(decode_memsize(raw).unwrap(), SIXTEEN_GIB);
    }

    #[test]
    fn test_decode_rejects_bad_lengths() {
        assert!(decode_memsize(&[]).is_err());
        assert!(decode_memsize(&[1, 2, 3, 4]).is_err());
        assert!(decode_memsize(&[0; 10]).is_err());
    }

    #[test]
    fn test_decode_rejects_nonzero_ninth_byte() {
        let mut raw = SIXTEEN_GIB.to_le_bytes().to_vec();
        raw.push(7);
        let err = decode_memsize(&raw).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_unsupported_host_fails_vm_query() {
        let host = UnsupportedHost::new();
        assert!(matches!(
            host.vm_statistics(),
            Err(CollectError::Unsupported)
        ));
        assert!(total_memory(&host).is_err());
    }
}
