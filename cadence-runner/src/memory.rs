//! Allocation tracking.
//!
//! A global allocator interceptor that counts bytes allocated and freed.
//! The runner resets the counters before each iteration and reads the delta
//! after; when the allocator is not installed the counters stay at zero and
//! memory deltas are reported as 0.
//!
//! Install in the binary under measurement:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: TrackingAllocator = TrackingAllocator;
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static FREED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATION_COUNT: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper that counts allocations.
pub struct TrackingAllocator;

// SAFETY: delegates all allocation to `System`; only updates counters.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            ALLOCATED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        FREED_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
        System.dealloc(ptr, layout)
    }
}

/// Reset the allocation counters. Called before each iteration.
pub fn reset_allocation_counter() {
    ALLOCATED_BYTES.store(0, Ordering::Relaxed);
    FREED_BYTES.store(0, Ordering::Relaxed);
    ALLOCATION_COUNT.store(0, Ordering::Relaxed);
}

/// Current `(net_bytes, allocation_count)` since the last reset.
///
/// `net_bytes` is allocated minus freed and may be negative when an
/// iteration releases memory set up earlier.
pub fn current_allocation() -> (i64, u64) {
    let allocated = ALLOCATED_BYTES.load(Ordering::Relaxed) as i64;
    let freed = FREED_BYTES.load(Ordering::Relaxed) as i64;
    (allocated - freed, ALLOCATION_COUNT.load(Ordering::Relaxed))
}
