//! Markdown to sanitized, syntax-highlighted HTML pipeline.
//!
//! This crate transforms a Markdown document into a single HTML string that
//! is safe for direct embedding, in strictly ordered stages:
//!
//! 1. Parse Markdown (CommonMark + GFM) with `pulldown-cmark`
//! 2. Convert the event stream to HTML, escaping all text content
//! 3. Sanitize the document through an allow-list (`ammonia`)
//! 4. Substitute syntax-highlighted fenced code blocks (`syntect`)
//! 5. Assign stable slug ids to headings for deep links
//!
//! Fenced code blocks are replaced by comment markers during conversion and
//! substituted after sanitization, so the highlighter's generated markup is
//! never subject to the allow-list while author-supplied HTML always is.
//!
//! The transform is deterministic: identical input and configuration yield
//! byte-identical output. Any stage failure surfaces as [`PipelineError`];
//! the pipeline never emits partial or unsanitized HTML.
//!
//! # Example
//!
//! ```
//! use tabledocs_renderer::{ContentPipeline, PipelineConfig};
//!
//! let pipeline = ContentPipeline::new(PipelineConfig::default()).unwrap();
//! let doc = pipeline.render("# Hello\n\n**Bold** text").unwrap();
//! assert!(doc.html.contains("<strong>Bold</strong>"));
//! ```

mod highlight;
mod pipeline;
mod sanitize;
mod slug;
mod writer;

pub use highlight::HighlightError;
pub use pipeline::{ContentPipeline, PipelineConfig, PipelineError, RenderedDoc};
pub use slug::slugify;
pub use writer::{TocEntry, escape_html};
