//! Plain liveness probe.
//!
//! Returns 200 OK with a static body when the process can answer HTTP at
//! all. Orchestrators poll this instead of the full heartbeat payload, which
//! pays for a host stats refresh on every call.

/// Liveness handler: the process is up if this responds.
pub async fn health() -> &'static str {
    "ok"
}
