//! CLI error types.

use tabledocs_config::ConfigError;
use tabledocs_renderer::PipelineError;
use tabledocs_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Server(String),
}
