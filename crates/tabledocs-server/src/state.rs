//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use tabledocs_site::{ContentStore, ExampleRegistry};

use crate::live_reload::LiveReloadManager;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Fixed list of example entries.
    pub(crate) registry: ExampleRegistry,
    /// Pre-rendered README content keyed by pathname.
    pub(crate) store: Arc<ContentStore>,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
}

impl AppState {
    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
