//! Example registry, navigation, and content build step.
//!
//! This crate provides:
//! - [`ExampleRegistry`]: the fixed, ordered list of example entries that
//!   drives example-section navigation
//! - [`resolve_navigation`]: per-request resolution of the current entry
//!   plus its prev/next neighbors and rendered README content
//! - [`SiteBuilder`]: the explicit build step that pre-renders every
//!   example's Markdown through the content pipeline, failing the build on
//!   the first transform error
//! - [`ContentStore`]: rendered HTML keyed by route pathname, with atomic
//!   per-entry replacement for watch mode
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use tabledocs_renderer::{ContentPipeline, PipelineConfig};
//! use tabledocs_site::{ExampleRegistry, SiteBuilder, resolve_navigation};
//!
//! let registry = ExampleRegistry::builtin();
//! let pipeline = ContentPipeline::new(PipelineConfig::default())?;
//! let builder = SiteBuilder::new(registry.clone(), pipeline, PathBuf::from("content"));
//! let store = builder.build()?;
//!
//! let nav = resolve_navigation(&registry, &store, "/examples/basic")?;
//! assert_eq!(nav.current_example.id, "basic");
//! # Ok(())
//! # }
//! ```

mod builder;
mod content;
mod navigation;
mod registry;

pub use builder::{BuildError, SiteBuilder};
pub use content::{ContentStore, RenderedExample};
pub use navigation::{NavigationContext, NavigationError, resolve_navigation};
pub use registry::{ExampleEntry, ExampleLink, ExampleRegistry, RegistryError};
