//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::stats::RuntimeStatsProvider;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration, the process start instant, and the runtime stats
/// provider. The start instant is captured once at bootstrap and injected
/// here; it is the only cross-request value and it never changes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
    pub stats: Arc<dyn RuntimeStatsProvider>,
}

impl AppState {
    /// Creates application state from the configuration, the instant the
    /// process started, and a stats provider.
    pub fn new(
        config: AppConfig,
        started_at: Instant,
        stats: Arc<dyn RuntimeStatsProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            started_at,
            stats,
        }
    }
}
