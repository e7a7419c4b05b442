//! `tabledocs serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use tabledocs_config::{CliSettings, Config};
use tabledocs_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tabledocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Example content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (timing logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let live_reload_enabled = self.resolve_live_reload_enabled();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            output_dir: None,
            live_reload_enabled,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content_resolved.source_dir.display()
        ));

        if config.live_reload.enabled {
            output.info("Live reload: enabled");
        } else {
            output.info("Live reload: disabled");
        }

        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(live_reload: Option<bool>, no_live_reload: bool) -> ServeArgs {
        ServeArgs {
            config: None,
            source_dir: None,
            host: None,
            port: None,
            verbose: false,
            live_reload,
            no_live_reload,
        }
    }

    #[test]
    fn test_live_reload_unset_defers_to_config() {
        assert_eq!(args(None, false).resolve_live_reload_enabled(), None);
    }

    #[test]
    fn test_live_reload_flag_passes_through() {
        assert_eq!(
            args(Some(true), false).resolve_live_reload_enabled(),
            Some(true)
        );
        assert_eq!(
            args(Some(false), false).resolve_live_reload_enabled(),
            Some(false)
        );
    }

    #[test]
    fn test_no_live_reload_disables() {
        assert_eq!(args(None, true).resolve_live_reload_enabled(), Some(false));
    }
}
