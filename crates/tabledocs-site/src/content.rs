//! Rendered content store.
//!
//! Holds the processed HTML for every example, keyed by route pathname.
//! Populated by the build step and mutated only by watch mode, which
//! replaces single entries atomically after a successful re-render.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Processed content for one example.
#[derive(Clone, Debug)]
pub struct RenderedExample {
    /// Sanitized, highlighted HTML.
    pub html: String,
    /// Title extracted from the README's first H1 heading.
    pub title: Option<String>,
}

/// Pathname-keyed store of rendered examples.
///
/// Reads are lock-cheap and return shared handles; a replacement never
/// affects in-flight readers of the previous version.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: RwLock<HashMap<String, Arc<RenderedExample>>>,
}

impl ContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered content for a pathname, if present.
    #[must_use]
    pub fn get(&self, pathname: &str) -> Option<Arc<RenderedExample>> {
        self.entries.read().unwrap().get(pathname).map(Arc::clone)
    }

    /// Insert or replace the content for a pathname.
    pub fn replace(&self, pathname: String, rendered: RenderedExample) {
        self.entries
            .write()
            .unwrap()
            .insert(pathname, Arc::new(rendered));
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}
