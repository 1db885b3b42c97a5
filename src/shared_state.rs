use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::models::location::LocationTable;

/// Read-only state shared by every handler. Nothing here changes after
/// startup, so there is no locking.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    /// City → peak sun hours reference table
    pub locations: Arc<LocationTable>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, locations: LocationTable) -> Self {
        Self {
            config: Arc::new(config),
            locations: Arc::new(locations),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
