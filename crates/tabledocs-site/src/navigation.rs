//! Per-request navigation resolution.
//!
//! Matches the requested path against the registry and derives the
//! prev/next entries by list position. The context is recomputed on every
//! request and discarded after render; only the content store caches
//! anything across requests.

use serde::Serialize;

use crate::content::ContentStore;
use crate::registry::{ExampleEntry, ExampleRegistry, RegistryError};

/// Navigation data handed to the page layer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    /// Entry matching the requested path.
    pub current_example: ExampleEntry,
    /// Entry immediately before in registry order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_example: Option<ExampleEntry>,
    /// Entry immediately after in registry order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_example: Option<ExampleEntry>,
    /// Pre-rendered README HTML for the current entry.
    pub rendered_content: String,
}

/// Navigation resolution error.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The path has no registry entry. The hosting layer decides whether
    /// this becomes a 404 or a hard error.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The entry exists but its content was never rendered.
    #[error("No rendered content for {0}")]
    MissingContent(String),
}

/// Resolve the navigation context for a request path.
pub fn resolve_navigation(
    registry: &ExampleRegistry,
    store: &ContentStore,
    path: &str,
) -> Result<NavigationContext, NavigationError> {
    let (index, current) = registry.resolve(path)?;
    let (previous, next) = registry.neighbors(index);

    let rendered = store
        .get(&current.pathname)
        .ok_or_else(|| NavigationError::MissingContent(current.pathname.clone()))?;

    Ok(NavigationContext {
        current_example: current.clone(),
        previous_example: previous.cloned(),
        next_example: next.cloned(),
        rendered_content: rendered.html.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RenderedExample;
    use pretty_assertions::assert_eq;

    fn registry() -> ExampleRegistry {
        ExampleRegistry::new(vec![
            ExampleEntry::new("basic", "Basic Table"),
            ExampleEntry::new("reactive-data", "Table with Reactive Data"),
            ExampleEntry::new("select", "Table with Select"),
        ])
        .unwrap()
    }

    fn store_for(registry: &ExampleRegistry) -> ContentStore {
        let store = ContentStore::new();
        for entry in registry.entries() {
            store.replace(
                entry.pathname.clone(),
                RenderedExample {
                    html: format!("<h1>{}</h1>", entry.title),
                    title: Some(entry.title.clone()),
                },
            );
        }
        store
    }

    #[test]
    fn test_first_entry_has_next_only() {
        let registry = registry();
        let store = store_for(&registry);

        let nav = resolve_navigation(&registry, &store, "/examples/basic").unwrap();

        assert_eq!(nav.current_example.id, "basic");
        assert!(nav.previous_example.is_none());
        assert_eq!(nav.next_example.unwrap().id, "reactive-data");
        assert_eq!(nav.rendered_content, "<h1>Basic Table</h1>");
    }

    #[test]
    fn test_last_entry_has_previous_only() {
        let registry = registry();
        let store = store_for(&registry);

        let nav = resolve_navigation(&registry, &store, "/examples/select").unwrap();

        assert_eq!(nav.current_example.id, "select");
        assert_eq!(nav.previous_example.unwrap().id, "reactive-data");
        assert!(nav.next_example.is_none());
    }

    #[test]
    fn test_miss_is_not_found() {
        let registry = registry();
        let store = store_for(&registry);

        let err = resolve_navigation(&registry, &store, "/examples/does-not-exist").unwrap_err();
        assert!(matches!(
            err,
            NavigationError::Registry(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_content_is_an_error() {
        let registry = registry();
        let store = ContentStore::new();

        let err = resolve_navigation(&registry, &store, "/examples/basic").unwrap_err();
        assert!(matches!(err, NavigationError::MissingContent(_)));
    }

    #[test]
    fn test_serialization_contract() {
        let registry = registry();
        let store = store_for(&registry);

        let nav = resolve_navigation(&registry, &store, "/examples/reactive-data").unwrap();
        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(json["currentExample"]["id"], "reactive-data");
        assert_eq!(json["previousExample"]["id"], "basic");
        assert_eq!(json["nextExample"]["id"], "select");
        assert_eq!(json["renderedContent"], "<h1>Table with Reactive Data</h1>");
    }

    #[test]
    fn test_boundary_fields_omitted_from_serialization() {
        let registry = registry();
        let store = store_for(&registry);

        let nav = resolve_navigation(&registry, &store, "/examples/basic").unwrap();
        let json = serde_json::to_value(&nav).unwrap();

        assert!(json.get("previousExample").is_none());
        assert_eq!(json["nextExample"]["id"], "reactive-data");
    }
}
