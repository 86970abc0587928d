// Application state module
// Shared by every connection for the lifetime of the process

use super::types::Config;
use crate::store::SharedStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
}

impl AppState {
    pub const fn new(config: Config, store: SharedStore) -> Self {
        Self { config, store }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
