//! Pipeline orchestration.
//!
//! [`ContentPipeline`] ties the stages together: parse, convert, sanitize,
//! substitute highlighted code blocks. Construction validates the configured
//! theme pair so a bad theme name fails the build instead of the first
//! render.

use pulldown_cmark::{Options, Parser};

use crate::highlight::{self, HighlightError};
use crate::sanitize;
use crate::writer::{self, HtmlWriter, TocEntry};

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Bundled syntect theme used for the light stylesheet.
    pub light_theme: String,
    /// Bundled syntect theme used for the dark stylesheet.
    pub dark_theme: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            light_theme: "InspiredGitHub".to_owned(),
            dark_theme: "base16-ocean.dark".to_owned(),
        }
    }
}

/// Error produced by the pipeline.
///
/// Any failure aborts the transform; partial or unsanitized output is never
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Highlighter or theme failure.
    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

/// Fully processed document.
#[derive(Clone, Debug)]
pub struct RenderedDoc {
    /// Sanitized, highlighted HTML ready for direct embedding.
    pub html: String,
    /// Text of the first H1 heading, if any.
    pub title: Option<String>,
    /// Table of contents entries (levels 2-6).
    pub toc: Vec<TocEntry>,
}

/// Markdown to HTML transformation pipeline.
///
/// Transforming the same input with the same configuration twice yields
/// byte-identical output; each document is processed independently with no
/// cross-document state.
#[derive(Debug)]
pub struct ContentPipeline {
    config: PipelineConfig,
}

impl ContentPipeline {
    /// Create a pipeline, validating the configured theme pair.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        for name in [&config.light_theme, &config.dark_theme] {
            if !highlight::theme_exists(name) {
                return Err(HighlightError::UnknownTheme(name.clone()).into());
            }
        }
        Ok(Self { config })
    }

    /// Parser options: CommonMark plus GFM tables, strikethrough, and
    /// task lists.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }

    /// Transform a Markdown document into sanitized, highlighted HTML.
    pub fn render(&self, markdown: &str) -> Result<RenderedDoc, PipelineError> {
        let parser = Parser::new_ext(markdown, Self::parser_options());
        let output = HtmlWriter::new().run(parser)?;

        // Each marker occurs exactly once: escaped text cannot contain a
        // comment and the writer strips comments from raw HTML.
        let mut html = sanitize::clean_document(&output.html);
        for (index, block) in output.code_blocks.iter().enumerate() {
            html = html.replacen(&writer::code_block_marker(index), block, 1);
        }

        Ok(RenderedDoc {
            html,
            title: output.title,
            toc: output.toc,
        })
    }

    /// Stylesheet for the configured light theme.
    pub fn light_theme_css(&self) -> Result<String, PipelineError> {
        Ok(highlight::theme_css(&self.config.light_theme)?)
    }

    /// Stylesheet for the configured dark theme.
    pub fn dark_theme_css(&self) -> Result<String, PipelineError> {
        Ok(highlight::theme_css(&self.config.dark_theme)?)
    }
}
