//! Per-thread allocation bookkeeping.
//!
//! Every engine object that is created or destroyed bumps a counter owned by the
//! calling thread. The counters exist so that callers can verify, from the outside,
//! that each allocation is matched by exactly one deallocation.

use std::cell::Cell;

/// Snapshot of the allocation counters of the calling thread.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CvDebugCounters {
    pub mat_headers_created: u64,
    pub mat_headers_released: u64,
    pub data_blocks_created: u64,
    pub data_blocks_released: u64,
    pub vectors_created: u64,
    pub vectors_released: u64,
    pub iterators_created: u64,
    pub iterators_released: u64,
}

impl CvDebugCounters {
    const ZERO: CvDebugCounters = CvDebugCounters {
        mat_headers_created: 0,
        mat_headers_released: 0,
        data_blocks_created: 0,
        data_blocks_released: 0,
        vectors_created: 0,
        vectors_released: 0,
        iterators_created: 0,
        iterators_released: 0,
    };

    /// Component-wise difference `self - earlier`.
    pub fn since(&self, earlier: &CvDebugCounters) -> CvDebugCounters {
        CvDebugCounters {
            mat_headers_created: self.mat_headers_created - earlier.mat_headers_created,
            mat_headers_released: self.mat_headers_released - earlier.mat_headers_released,
            data_blocks_created: self.data_blocks_created - earlier.data_blocks_created,
            data_blocks_released: self.data_blocks_released - earlier.data_blocks_released,
            vectors_created: self.vectors_created - earlier.vectors_created,
            vectors_released: self.vectors_released - earlier.vectors_released,
            iterators_created: self.iterators_created - earlier.iterators_created,
            iterators_released: self.iterators_released - earlier.iterators_released,
        }
    }
}

thread_local! {
    static COUNTERS: Cell<CvDebugCounters> = const { Cell::new(CvDebugCounters::ZERO) };
}

pub(crate) fn bump(update: impl FnOnce(&mut CvDebugCounters)) {
    COUNTERS.with(|cell| {
        let mut counters = cell.get();
        update(&mut counters);
        cell.set(counters);
    });
}

/// Returns the allocation counters of the calling thread.
#[unsafe(no_mangle)]
pub extern "C" fn cv_debug_counters() -> CvDebugCounters {
    COUNTERS.with(Cell::get)
}
