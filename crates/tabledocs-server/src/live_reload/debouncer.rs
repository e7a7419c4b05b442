//! Event debouncing for live reload.
//!
//! Editors commonly emit several filesystem events per save (truncate,
//! write, rename). The debouncer coalesces them into one event per path
//! so each save triggers at most one re-render.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Kind of filesystem event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FsEventKind {
    Created,
    Modified,
    Removed,
}

/// A debounced filesystem event.
#[derive(Clone, Debug)]
pub(crate) struct FsEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
}

/// Pending event waiting to be emitted.
struct PendingEvent {
    kind: FsEventKind,
    deadline: Instant,
}

/// Thread-safe per-path event coalescer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    debounce_duration: Duration,
}

impl EventDebouncer {
    /// Create a new debouncer with the specified debounce duration.
    pub fn new(debounce_duration: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            debounce_duration,
        }
    }

    /// Record an event.
    ///
    /// Thread-safe, can be called from the notify callback. Recording an
    /// event for a path that already has one pending coalesces the pair
    /// and pushes the deadline out.
    pub fn record(&self, path: PathBuf, kind: FsEventKind) {
        use std::collections::hash_map::Entry;

        let mut pending = self.pending.lock().unwrap();
        let deadline = Instant::now() + self.debounce_duration;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(PendingEvent { kind, deadline });
            }
            Entry::Occupied(mut entry) => {
                if let Some(kind) = Self::coalesce(entry.get().kind, kind) {
                    entry.get_mut().kind = kind;
                    entry.get_mut().deadline = deadline;
                } else {
                    // Created then Removed within one window: the file
                    // never existed as far as clients are concerned
                    entry.remove();
                }
            }
        }
    }

    /// Coalesce two event kinds for the same path.
    ///
    /// Returns `None` when both events cancel out.
    #[allow(clippy::match_same_arms)]
    fn coalesce(existing: FsEventKind, new: FsEventKind) -> Option<FsEventKind> {
        use FsEventKind::{Created, Modified, Removed};

        match (existing, new) {
            (Created, Created) => Some(Created),
            (Created, Modified) => Some(Created),
            (Created, Removed) => None,

            (Modified, Created) => Some(Created), // save via temp + rename
            (Modified, Modified) => Some(Modified),
            (Modified, Removed) => Some(Removed),

            (Removed, Created) => Some(Modified), // file was replaced
            (Removed, Modified) => Some(Removed),
            (Removed, Removed) => Some(Removed),
        }
    }

    /// Drain events that have passed their debounce deadline.
    ///
    /// Thread-safe, called from the processing task.
    pub fn drain_ready(&self) -> Vec<FsEvent> {
        let mut pending = self.pending.lock().unwrap();
        let now = Instant::now();

        let ready_paths: Vec<PathBuf> = pending
            .iter()
            .filter(|(_, event)| event.deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();

        ready_paths
            .into_iter()
            .map(|path| {
                let event = pending.remove(&path).expect("path was just found");
                FsEvent {
                    path,
                    kind: event.kind,
                }
            })
            .collect()
    }
}
