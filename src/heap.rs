//! Heap allocation counters.
//!
//! A counting wrapper around the system allocator that tracks live bytes,
//! cumulative bytes, and the high-water mark. The heartbeat endpoint reads
//! these counters to report allocation figures for a runtime that has no
//! garbage collector to ask.
//!
//! Counters use relaxed atomics; they feed advisory snapshots, not
//! synchronization.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATED: AtomicU64 = AtomicU64::new(0);
static TOTAL_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static PEAK_ALLOCATED: AtomicU64 = AtomicU64::new(0);

/// System allocator wrapper that maintains the module's counters.
///
/// Installed with `#[global_allocator]` in the binary; the library only
/// defines it so tests and alternative binaries can opt in.
pub struct CountingAllocator;

fn record_alloc(size: usize) {
    let live = ALLOCATED.fetch_add(size as u64, Ordering::Relaxed) + size as u64;
    TOTAL_ALLOCATED.fetch_add(size as u64, Ordering::Relaxed);
    PEAK_ALLOCATED.fetch_max(live, Ordering::Relaxed);
}

fn record_dealloc(size: usize) {
    ALLOCATED.fetch_sub(size as u64, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Bytes currently allocated through the global allocator.
pub fn allocated() -> u64 {
    ALLOCATED.load(Ordering::Relaxed)
}

/// Cumulative bytes allocated since process start (monotonic).
pub fn total_allocated() -> u64 {
    TOTAL_ALLOCATED.load(Ordering::Relaxed)
}

/// High-water mark of live allocated bytes.
pub fn peak_allocated() -> u64 {
    PEAK_ALLOCATED.load(Ordering::Relaxed)
}
