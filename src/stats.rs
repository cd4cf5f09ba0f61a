//! Runtime statistics collection.
//!
//! [`RuntimeStatsProvider`] is the narrow capability the heartbeat handler
//! depends on: one call producing a [`RuntimeStats`] snapshot. The live
//! implementation combines the heap counters, sysinfo's view of the process,
//! and the tokio runtime's task metrics; tests substitute a deterministic
//! provider instead.

use std::sync::Mutex;

use sysinfo::{Pid, System};

use crate::heap;

/// Toolchain version recorded by the build script.
const RUNTIME_VERSION: &str = env!("VITALS_RUSTC_VERSION");

/// Point-in-time snapshot of process and runtime statistics.
///
/// All byte quantities are raw counts; formatting happens at the edge when
/// the response is assembled.
#[derive(Debug, Clone)]
pub struct RuntimeStats {
    /// Live bytes currently allocated on the heap
    pub allocated: u64,
    /// Cumulative bytes allocated since process start
    pub total_allocated: u64,
    /// Bytes the OS has actually given the process (resident set size)
    pub sys: u64,
    /// Completed garbage-collection cycles (always 0: no collector)
    pub gc_cycles: u64,
    /// Live heap bytes (identical to `allocated`; kept as a separate field
    /// because the wire contract reports both)
    pub heap_allocated: u64,
    /// High-water mark of live heap bytes
    pub heap_sys: u64,
    /// Live async tasks in the runtime
    pub tasks: usize,
    /// Logical CPU count
    pub cpus: usize,
    /// Toolchain version string
    pub runtime_version: &'static str,
    /// Operating system name
    pub os: &'static str,
    /// CPU architecture name
    pub arch: &'static str,
}

/// Source of [`RuntimeStats`] snapshots.
pub trait RuntimeStatsProvider: Send + Sync {
    fn snapshot(&self) -> RuntimeStats;
}

/// Live provider backed by the heap counters, sysinfo, and tokio metrics.
pub struct HostStatsProvider {
    /// sysinfo requires `&mut` to refresh; the lock is held for one
    /// refresh-and-read per snapshot
    system: Mutex<System>,
    pid: Pid,
    cpus: usize,
}

impl HostStatsProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        let cpus = system.cpus().len();

        Self {
            system: Mutex::new(system),
            pid: Pid::from_u32(std::process::id()),
            cpus,
        }
    }
}

impl Default for HostStatsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeStatsProvider for HostStatsProvider {
    fn snapshot(&self) -> RuntimeStats {
        let resident = {
            let mut system = self.system.lock().expect("sysinfo lock poisoned");
            system.refresh_process(self.pid);
            system.process(self.pid).map(|p| p.memory()).unwrap_or(0)
        };

        // Zero when called outside a tokio runtime, e.g. from synchronous
        // tests; the HTTP handler always runs inside one.
        let tasks = tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_alive_tasks())
            .unwrap_or(0);

        let allocated = heap::allocated();

        RuntimeStats {
            allocated,
            total_allocated: heap::total_allocated(),
            sys: resident,
            gc_cycles: 0,
            heap_allocated: allocated,
            heap_sys: heap::peak_allocated(),
            tasks,
            cpus: self.cpus,
            runtime_version: RUNTIME_VERSION,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}
