//! vitals: a server heartbeat endpoint.
//!
//! Exposes process vitals over HTTP: status, uptime, memory figures, and
//! runtime system information, collected per request from the heap counters,
//! sysinfo, and the tokio runtime.

pub mod config;
pub mod heap;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod stats;
