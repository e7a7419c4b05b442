//! Live reload manager.
//!
//! Coordinates file watching, re-rendering, and WebSocket broadcasting.
//! A changed README is re-rendered through the content pipeline and
//! swapped into the content store before clients are told to reload; a
//! failed re-render keeps the previous content in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tabledocs_site::{ContentStore, SiteBuilder};
use tokio::sync::{broadcast, mpsc};

use super::debouncer::{EventDebouncer, FsEvent, FsEventKind};

/// Event sent to connected WebSocket clients when content changes.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: String,
    /// Route pathname whose content changed.
    path: String,
}

/// Default debounce duration in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Poll interval for draining debounced events.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Manages file watching and broadcasting reload events.
pub(crate) struct LiveReloadManager {
    source_dir: PathBuf,
    watch_patterns: Vec<String>,
    builder: Arc<SiteBuilder>,
    store: Arc<ContentStore>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watcher: Option<RecommendedWatcher>,
    debounce_ms: u64,
}

impl LiveReloadManager {
    /// Create a new live reload manager.
    #[must_use]
    pub(crate) fn new(
        source_dir: PathBuf,
        watch_patterns: Option<Vec<String>>,
        builder: Arc<SiteBuilder>,
        store: Arc<ContentStore>,
        broadcaster: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        Self {
            source_dir,
            watch_patterns: watch_patterns.unwrap_or_else(|| vec!["**/*.md".to_string()]),
            builder,
            store,
            broadcaster,
            watcher: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// Set the debounce duration in milliseconds.
    #[must_use]
    pub(crate) fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Start the file watcher.
    ///
    /// Spawns background tasks that watch for file changes, re-render the
    /// affected examples, and broadcast reload events to connected
    /// WebSocket clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        let (tx, mut rx) = mpsc::channel::<Event>(100);

        // Create watcher with callback that sends events to channel
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Use blocking_send since callback is sync
                let _ = tx.blocking_send(event);
            }
        })?;

        watcher.watch(&self.source_dir, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        let debouncer = Arc::new(EventDebouncer::new(Duration::from_millis(self.debounce_ms)));
        let debouncer_for_record = Arc::clone(&debouncer);

        // Task recording raw events into the debouncer
        let watch_patterns = self.watch_patterns.clone();
        let source_dir = self.source_dir.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(&event, &source_dir, &watch_patterns, &debouncer_for_record);
            }
        });

        // Task processing debounced events
        let builder = Arc::clone(&self.builder);
        let store = Arc::clone(&self.store);
        let broadcaster = self.broadcaster.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);

            loop {
                interval.tick().await;

                for fs_event in debouncer.drain_ready() {
                    Self::handle_fs_event(&fs_event, &builder, &store, &broadcaster);
                }
            }
        });

        Ok(())
    }

    /// Record a raw filesystem event into the debouncer.
    fn record_event(
        event: &Event,
        source_dir: &Path,
        watch_patterns: &[String],
        debouncer: &EventDebouncer,
    ) {
        let kind = match event.kind {
            EventKind::Create(_) => FsEventKind::Created,
            EventKind::Modify(_) => FsEventKind::Modified,
            EventKind::Remove(_) => FsEventKind::Removed,
            _ => return,
        };

        for path in &event.paths {
            if !Self::matches_patterns(path, source_dir, watch_patterns) {
                continue;
            }

            debouncer.record(path.clone(), kind);
            tracing::debug!(path = %path.display(), ?kind, "Recorded filesystem event");
        }
    }

    /// Handle a debounced filesystem event.
    ///
    /// Re-renders the affected example and broadcasts only after the new
    /// content is in the store. On any failure the store keeps the last
    /// good render and no reload is sent.
    fn handle_fs_event(
        fs_event: &FsEvent,
        builder: &SiteBuilder,
        store: &ContentStore,
        broadcaster: &broadcast::Sender<ReloadEvent>,
    ) {
        let start = Instant::now();

        let Some(entry) = builder.entry_for_source(&fs_event.path) else {
            tracing::debug!(
                path = %fs_event.path.display(),
                "Changed file is not a registered example, ignoring"
            );
            return;
        };

        if fs_event.kind == FsEventKind::Removed {
            tracing::warn!(
                id = %entry.id,
                "Example source removed, keeping last rendered content"
            );
            return;
        }

        match builder.render_entry(entry) {
            Ok(rendered) => {
                store.replace(entry.pathname.clone(), rendered);
            }
            Err(err) => {
                tracing::warn!(
                    id = %entry.id,
                    error = %err,
                    "Re-render failed, keeping last rendered content"
                );
                return;
            }
        }

        let reload_event = ReloadEvent {
            event_type: "reload".to_string(),
            path: entry.pathname.clone(),
        };
        let _ = broadcaster.send(reload_event);

        tracing::info!(
            path = %entry.pathname,
            kind = ?fs_event.kind,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Live reload event processed"
        );
    }

    /// Check if a path matches any watch pattern.
    fn matches_patterns(path: &Path, source_dir: &Path, patterns: &[String]) -> bool {
        let Ok(relative) = path.strip_prefix(source_dir) else {
            return false;
        };

        let relative_str = relative.to_string_lossy();

        patterns
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .any(|glob_pattern| glob_pattern.matches(&relative_str))
    }

    /// Get a receiver for reload events.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}
