//! `tabledocs build` command implementation.

use std::path::PathBuf;

use clap::Args;
use tabledocs_config::{CliSettings, Config};
use tabledocs_renderer::{ContentPipeline, PipelineConfig};
use tabledocs_site::{ExampleRegistry, SiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover tabledocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Example content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for static artifacts (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Renders every example README through the content pipeline and
    /// writes the HTML plus theme stylesheets to the output directory.
    /// The first read or transform error aborts the build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.out_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let pipeline = ContentPipeline::new(PipelineConfig {
            light_theme: config.highlight.light_theme.clone(),
            dark_theme: config.highlight.dark_theme.clone(),
        })?;
        let builder = SiteBuilder::new(
            ExampleRegistry::builtin(),
            pipeline,
            config.content_resolved.source_dir.clone(),
        );

        output.info(&format!(
            "Building content from {}",
            config.content_resolved.source_dir.display()
        ));

        let store = builder.build()?;
        builder.write_artifacts(&store, &config.content_resolved.output_dir)?;

        output.success(&format!(
            "Wrote {} examples to {}",
            store.len(),
            config.content_resolved.output_dir.display()
        ));

        Ok(())
    }
}
