//! The example registry.
//!
//! An immutable ordered list of demo entries, fixed at build time. Route
//! pathnames are the lookup key and must be unique; lookup is a linear scan
//! since the registry holds tens of entries at most.

use serde::Serialize;

/// A titled reference link attached to an example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExampleLink {
    /// Display title.
    pub title: String,
    /// Link target.
    pub url: String,
}

/// One example in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleEntry {
    /// Unique slug identifying the example.
    pub id: String,
    /// Human-readable display name.
    pub title: String,
    /// Canonical route path; unique across the registry.
    pub pathname: String,
    /// Repository-relative path to the example's source.
    pub source_path: String,
    /// Related documentation links; may be empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ExampleLink>,
}

impl ExampleEntry {
    /// Create an entry with the conventional pathname and source path for
    /// its id.
    #[must_use]
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            pathname: format!("/examples/{id}"),
            source_path: format!("content/{id}"),
            links: Vec::new(),
        }
    }

    /// Attach a reference link.
    #[must_use]
    pub fn with_link(mut self, title: &str, url: &str) -> Self {
        self.links.push(ExampleLink {
            title: title.to_owned(),
            url: url.to_owned(),
        });
        self
    }
}

/// Registry error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two entries share a pathname.
    #[error("Duplicate pathname in example registry: {0}")]
    DuplicatePathname(String),
    /// No entry matches the requested path.
    #[error("Example not found: {0}")]
    NotFound(String),
}

/// The fixed, ordered list of example entries.
///
/// Immutable after construction; loaded once per process.
#[derive(Clone, Debug)]
pub struct ExampleRegistry {
    entries: Vec<ExampleEntry>,
}

impl ExampleRegistry {
    /// Build a registry, validating pathname uniqueness.
    pub fn new(entries: Vec<ExampleEntry>) -> Result<Self, RegistryError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.pathname == entry.pathname) {
                return Err(RegistryError::DuplicatePathname(entry.pathname.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The registry of examples shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = vec![
            ExampleEntry::new("basic", "Basic Table"),
            ExampleEntry::new("reactive-data", "Table with Reactive Data")
                .with_link("Reactive data guide", "/docs/reactive-data"),
            ExampleEntry::new("select", "Table with Select")
                .with_link("Row selection guide", "/docs/row-selection"),
            ExampleEntry::new("row-expansion", "Table with Row Expansion")
                .with_link("Row expansion guide", "/docs/row-expansion"),
        ];
        Self::new(entries).expect("builtin registry pathnames are unique")
    }

    /// All entries in registry order.
    #[must_use]
    pub fn entries(&self) -> &[ExampleEntry] {
        &self.entries
    }

    /// Find the entry whose pathname equals `path`.
    ///
    /// Returns the entry together with its position, which drives prev/next
    /// derivation.
    pub fn resolve(&self, path: &str) -> Result<(usize, &ExampleEntry), RegistryError> {
        self.entries
            .iter()
            .position(|entry| entry.pathname == path)
            .map(|index| (index, &self.entries[index]))
            .ok_or_else(|| RegistryError::NotFound(path.to_owned()))
    }

    /// Entries immediately before and after `index`; absent at the
    /// boundaries, no wraparound.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> (Option<&ExampleEntry>, Option<&ExampleEntry>) {
        let previous = index.checked_sub(1).and_then(|i| self.entries.get(i));
        let next = self.entries.get(index + 1);
        (previous, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_entry_registry() -> ExampleRegistry {
        ExampleRegistry::new(vec![
            ExampleEntry::new("basic", "Basic Table"),
            ExampleEntry::new("reactive-data", "Table with Reactive Data"),
            ExampleEntry::new("select", "Table with Select"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_first_entry() {
        let registry = three_entry_registry();
        let (index, entry) = registry.resolve("/examples/basic").unwrap();
        assert_eq!(index, 0);
        assert_eq!(entry.id, "basic");

        let (previous, next) = registry.neighbors(index);
        assert!(previous.is_none());
        assert_eq!(next.unwrap().id, "reactive-data");
    }

    #[test]
    fn test_resolve_middle_entry() {
        let registry = three_entry_registry();
        let (index, entry) = registry.resolve("/examples/reactive-data").unwrap();
        assert_eq!(entry.id, "reactive-data");

        let (previous, next) = registry.neighbors(index);
        assert_eq!(previous.unwrap().id, "basic");
        assert_eq!(next.unwrap().id, "select");
    }

    #[test]
    fn test_resolve_last_entry_has_no_next() {
        let registry = three_entry_registry();
        let (index, entry) = registry.resolve("/examples/select").unwrap();
        assert_eq!(entry.id, "select");

        let (previous, next) = registry.neighbors(index);
        assert_eq!(previous.unwrap().id, "reactive-data");
        assert!(next.is_none());
    }

    #[test]
    fn test_resolve_miss() {
        let registry = three_entry_registry();
        let err = registry.resolve("/examples/does-not-exist").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(path) if path == "/examples/does-not-exist"));
    }

    #[test]
    fn test_duplicate_pathname_rejected() {
        let err = ExampleRegistry::new(vec![
            ExampleEntry::new("basic", "Basic Table"),
            ExampleEntry::new("basic", "Basic Table Again"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicatePathname(path) if path == "/examples/basic"
        ));
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = ExampleRegistry::builtin();
        assert!(!registry.entries().is_empty());
        assert_eq!(registry.entries()[0].id, "basic");
    }

    #[test]
    fn test_entry_serialization_shape() {
        let entry = ExampleEntry::new("basic", "Basic Table").with_link("Guide", "/docs/basic");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], "basic");
        assert_eq!(json["pathname"], "/examples/basic");
        assert_eq!(json["sourcePath"], "content/basic");
        assert_eq!(json["links"][0]["title"], "Guide");
    }

    #[test]
    fn test_empty_links_omitted_from_serialization() {
        let entry = ExampleEntry::new("basic", "Basic Table");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("links").is_none());
    }
}
