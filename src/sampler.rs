//! Process memory sampling for before/after snapshots
//!
//! KNOWN INACCURACY, preserved deliberately: the snapshots measure the
//! analysis tool's *own* process, not the program being analyzed. The
//! original design read the runtime counters of the running optimizer and
//! paired them with a synthetic "after" estimate (see
//! [`crate::analyzer::estimate`]); this port reproduces those semantics
//! faithfully rather than silently fixing them. The resulting improvement
//! percentage is an estimation policy, never a measured truth.
//!
//! Rust has no garbage collector, so the three generational collection
//! counters always read zero from [`ProcessSampler`]; the fields and the
//! counter-wise delta are kept so the data model and downstream math match.

use crate::model::MemorySnapshot;
use std::time::SystemTime;
use sysinfo::{ProcessesToUpdate, System};

/// Point-in-time sampler of process resource counters.
///
/// Implementations must be best-effort synchronous reads with no side
/// effects beyond normal measurement overhead.
pub trait Sampler {
    /// Capture the calling process's current counters
    fn sample(&self) -> MemorySnapshot;
}

/// Sampler backed by `sysinfo`, reading this process's own counters.
///
/// `allocated_bytes` maps to the resident set (the closest available proxy
/// for the original's managed-heap reading) and `working_set` to the
/// virtual size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSampler;

impl ProcessSampler {
    /// Create a new process sampler
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for ProcessSampler {
    fn sample(&self) -> MemorySnapshot {
        let mut snapshot = MemorySnapshot {
            allocated_bytes: 0,
            working_set: 0,
            gen_collections: [0; 3],
            captured_at: SystemTime::now(),
        };

        let Ok(pid) = sysinfo::get_current_pid() else {
            log::warn!("could not resolve current pid; returning zero snapshot");
            return snapshot;
        };

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        if let Some(process) = system.process(pid) {
            snapshot.allocated_bytes = process.memory() as i64;
            snapshot.working_set = process.virtual_memory() as i64;
        } else {
            log::warn!("process {} not visible to sysinfo; returning zero snapshot", pid);
        }

        snapshot
    }
}
