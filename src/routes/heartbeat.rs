//! Heartbeat endpoint reporting server vitals.
//!
//! Returns a point-in-time snapshot of process health: status, uptime,
//! memory figures, and runtime system information. Byte quantities are
//! rendered with binary (1024-based) prefixes; uptime is decomposed into
//! days/hours/minutes/seconds. The handler has no failure path: everything
//! it reads is an in-process runtime query.

use std::time::Duration;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{STATUS_HEALTHY, STATUS_MESSAGE};
use crate::state::AppState;
use crate::stats::RuntimeStats;

/// Full vitals payload. Field names and nesting are the external contract;
/// consumers parse these exact keys.
#[derive(Debug, Serialize)]
pub struct ServerVitals {
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    pub uptime: Uptime,
    pub memory: Memory,
    pub system: SystemInfo,
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Uptime {
    pub raw: String,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct Memory {
    pub alloc: String,
    #[serde(rename = "totalAlloc")]
    pub total_alloc: String,
    pub sys: String,
    #[serde(rename = "numGC")]
    pub num_gc: u64,
    #[serde(rename = "heapAlloc")]
    pub heap_alloc: String,
    #[serde(rename = "heapSys")]
    pub heap_sys: String,
    pub free: String,
    pub used: String,
    pub usage: String,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    #[serde(rename = "goroutines")]
    pub tasks: usize,
    #[serde(rename = "numCPU")]
    pub cpus: usize,
    #[serde(rename = "goVersion")]
    pub runtime_version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

/// Formats a byte count with binary unit prefixes (B, KB, MB, GB, TB, PB, EB).
///
/// Values below 1024 render as an exact integer with a "B" suffix; larger
/// values use two decimal places in the largest unit whose magnitude is >= 1.
fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];
    format!("{:.2} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Decomposes an elapsed duration into (days, hours, minutes, seconds).
///
/// Truncates to whole seconds; the parts recompose to the truncated input
/// with seconds and minutes in [0, 60) and hours in [0, 24).
fn split_uptime(uptime: Duration) -> (u64, u64, u64, u64) {
    let total = uptime.as_secs();
    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = (total / 3600) % 24;
    let days = total / 86400;
    (days, hours, minutes, seconds)
}

impl ServerVitals {
    /// Assembles the vitals record from a stats snapshot. Pure, so tests can
    /// drive it with fixed inputs.
    pub fn collect(stats: &RuntimeStats, uptime: Duration, timestamp: DateTime<Utc>) -> Self {
        let (days, hours, minutes, seconds) = split_uptime(uptime);

        let used = stats.allocated;
        // saturating: the OS reading and the allocator counter are separate
        // snapshots and may cross under churn
        let free = stats.sys.saturating_sub(used);
        let usage = if stats.sys == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", used as f64 / stats.sys as f64 * 100.0)
        };

        Self {
            status: Status {
                code: STATUS_HEALTHY,
                message: STATUS_MESSAGE,
            },
            timestamp,
            uptime: Uptime {
                raw: format!("{}d{}h{}m{}s", days, hours, minutes, seconds),
                days,
                hours,
                minutes,
                seconds,
            },
            memory: Memory {
                alloc: format_bytes(stats.allocated),
                total_alloc: format_bytes(stats.total_allocated),
                sys: format_bytes(stats.sys),
                num_gc: stats.gc_cycles,
                heap_alloc: format_bytes(stats.heap_allocated),
                heap_sys: format_bytes(stats.heap_sys),
                free: format_bytes(free),
                used: format_bytes(used),
                usage,
            },
            system: SystemInfo {
                tasks: stats.tasks,
                cpus: stats.cpus,
                runtime_version: stats.runtime_version,
                os: stats.os,
                arch: stats.arch,
            },
        }
    }
}

/// Heartbeat handler: snapshot the runtime, compute uptime, return vitals.
pub async fn heartbeat(State(state): State<AppState>) -> Json<ServerVitals> {
    let stats = state.stats.snapshot();
    let uptime = state.started_at.elapsed();

    tracing::debug!(
        uptime_secs = uptime.as_secs(),
        tasks = stats.tasks,
        allocated = stats.allocated,
        "Collected vitals"
    );

    Json(ServerVitals::collect(&stats, uptime, Utc::now()))
}
