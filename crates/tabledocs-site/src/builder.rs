//! The content build step.
//!
//! The original site resolved Markdown imports into processed HTML through
//! a build-tool hook; here that is an explicit pre-render pass. Every
//! registry entry's README is pushed through the content pipeline before
//! the site can serve anything, and the first read or transform error
//! aborts the whole build. Unsafe or partial output is never published.

use std::path::{Path, PathBuf};

use tabledocs_renderer::{ContentPipeline, PipelineError};

use crate::content::{ContentStore, RenderedExample};
use crate::registry::{ExampleEntry, ExampleRegistry};

/// Error produced by the build step.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Markdown source could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The content pipeline failed for a source file.
    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        source: PipelineError,
    },
    /// A generated artifact could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pre-renders example READMEs into a [`ContentStore`].
pub struct SiteBuilder {
    registry: ExampleRegistry,
    pipeline: ContentPipeline,
    content_dir: PathBuf,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(registry: ExampleRegistry, pipeline: ContentPipeline, content_dir: PathBuf) -> Self {
        Self {
            registry,
            pipeline,
            content_dir,
        }
    }

    /// Markdown source file for an entry.
    #[must_use]
    pub fn source_file(&self, entry: &ExampleEntry) -> PathBuf {
        self.content_dir.join(&entry.id).join("README.md")
    }

    /// Map a watched filesystem path back to its registry entry.
    ///
    /// Returns `None` for paths that are not an example's README.
    #[must_use]
    pub fn entry_for_source(&self, path: &Path) -> Option<&ExampleEntry> {
        self.registry
            .entries()
            .iter()
            .find(|entry| self.source_file(entry) == path)
    }

    /// Render a single entry's README.
    ///
    /// Each file's transformation is independent; no state crosses files.
    pub fn render_entry(&self, entry: &ExampleEntry) -> Result<RenderedExample, BuildError> {
        let path = self.source_file(entry);
        let markdown = std::fs::read_to_string(&path).map_err(|source| BuildError::Read {
            path: path.clone(),
            source,
        })?;
        let doc = self
            .pipeline
            .render(&markdown)
            .map_err(|source| BuildError::Render { path, source })?;
        Ok(RenderedExample {
            html: doc.html,
            title: doc.title,
        })
    }

    /// Render every registry entry, failing on the first error.
    pub fn build(&self) -> Result<ContentStore, BuildError> {
        let store = ContentStore::new();
        for entry in self.registry.entries() {
            let rendered = self.render_entry(entry)?;
            tracing::info!(id = %entry.id, "Rendered example content");
            store.replace(entry.pathname.clone(), rendered);
        }
        Ok(store)
    }

    /// Write static artifacts: one HTML file per example plus the theme
    /// stylesheet pair.
    pub fn write_artifacts(&self, store: &ContentStore, out_dir: &Path) -> Result<(), BuildError> {
        std::fs::create_dir_all(out_dir).map_err(|source| BuildError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;

        for entry in self.registry.entries() {
            let Some(rendered) = store.get(&entry.pathname) else {
                continue;
            };
            let path = out_dir.join(format!("{}.html", entry.id));
            std::fs::write(&path, &rendered.html)
                .map_err(|source| BuildError::Write { path, source })?;
        }

        for (name, css) in [
            ("highlight-light.css", self.theme_css_light()?),
            ("highlight-dark.css", self.theme_css_dark()?),
        ] {
            let path = out_dir.join(name);
            std::fs::write(&path, css).map_err(|source| BuildError::Write { path, source })?;
        }

        Ok(())
    }

    fn theme_css_light(&self) -> Result<String, BuildError> {
        self.pipeline
            .light_theme_css()
            .map_err(|source| BuildError::Render {
                path: PathBuf::from("highlight-light.css"),
                source,
            })
    }

    fn theme_css_dark(&self) -> Result<String, BuildError> {
        self.pipeline
            .dark_theme_css()
            .map_err(|source| BuildError::Render {
                path: PathBuf::from("highlight-dark.css"),
                source,
            })
    }
}
