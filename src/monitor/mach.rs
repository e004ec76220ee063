//! Darwin host queries. All `unsafe` in the crate lives here.

use super::host::HostQuery;
use crate::error::CollectError;
use crate::model::VmCounters;
use std::ffi::CString;
use std::io;
use std::mem;
use std::ptr;
use std::sync::OnceLock;

const HOST_VM_INFO: i32 = 2;
const HOST_VM_INFO_COUNT: u32 = (mem::size_of::<VmStatistics>() / mem::size_of::<i32>()) as u32;
const KERN_SUCCESS: i32 = 0;

// vm_statistics_data_t from <mach/vm_statistics.h>
#[repr(C)]
#[derive(Default)]
#[allow(dead_code)]
struct VmStatistics {
    free_count: u32,
    active_count: u32,
    inactive_count: u32,
    wire_count: u32,
    zero_fill_count: u32,
    reactivations: u32,
    pageins: u32,
    pageouts: u32,
    faults: u32,
    cow_faults: u32,
    lookups: u32,
    hits: u32,
    purgeable_count: u32,
    purges: u32,
    speculative_count: u32,
}

extern "C" {
    fn mach_host_self() -> u32;
    fn host_statistics(host: u32, flavor: i32, info: *mut i32, count: *mut u32) -> i32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MachHost;

impl MachHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostQuery for MachHost {
    fn vm_statistics(&self) -> Result<VmCounters, CollectError> {
        let mut stat = VmStatistics::default();
        let mut count = HOST_VM_INFO_COUNT;
        // SAFETY: `stat` is a repr(C) vm_statistics and `count` holds its size
        // in integer_t units, so the kernel writes within bounds.
        let ret = unsafe {
            host_statistics(
                mach_host_self(),
                HOST_VM_INFO,
                &mut stat as *mut VmStatistics as *mut i32,
                &mut count,
            )
        };
        if ret != KERN_SUCCESS {
            return Err(CollectError::KernelQuery(ret));
        }
        Ok(VmCounters {
            free_count: stat.free_count,
            active_count: stat.active_count,
            inactive_count: stat.inactive_count,
            wire_count: stat.wire_count,
            zero_fill_count: stat.zero_fill_count,
            reactivations: stat.reactivations,
            pageins: stat.pageins,
            pageouts: stat.pageouts,
            purgeable_count: stat.purgeable_count,
        })
    }

    fn sysctl(&self, key: &'static str) -> io::Result<Vec<u8>> {
        let name = CString::new(key).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut len: libc::size_t = 0;
        // SAFETY: a null output buffer asks only for the value's length.
        let ret = unsafe {
            libc::sysctlbyname(name.as_ptr(), ptr::null_mut(), &mut len, ptr::null_mut(), 0)
        };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut buf = vec![0u8; len];
        // SAFETY: `buf` is `len` bytes long and `len` tells the kernel so.
        let ret = unsafe {
            libc::sysctlbyname(
                name.as_ptr(),
                buf.as_mut_ptr() as *mut libc::c_void,
                &mut len,
                ptr::null_mut(),
                0,
            )
        };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        buf.truncate(len);
        Ok(buf)
    }

    fn page_size(&self) -> u64 {
        static PAGE_SIZE: OnceLock<u64> = OnceLock::new();
        // SAFETY: sysconf has no preconditions.
        *PAGE_SIZE.get_or_init(|| unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as u64)
    }
}
