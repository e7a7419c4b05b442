//! HTTP server for the tabledocs example site.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - API endpoints for synthetic user profiles, the example registry, and
//!   per-example navigation contexts
//! - WebSocket endpoint for live reload during development
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tabledocs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 5173,
//!         source_dir: PathBuf::from("content"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► Rust axum server (tabledocs-server)
//!                        │
//!                        ├─► API routes (Rust handlers)
//!                        │       │
//!                        │       ├─► ExampleRegistry + ContentStore
//!                        │       └─► Profile generator
//!                        │
//!                        └─► WebSocket (Rust LiveReloadManager)
//!                                │
//!                                └─► notify (direct Rust crate)
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tabledocs_renderer::{ContentPipeline, PipelineConfig};
use tabledocs_site::{ExampleRegistry, SiteBuilder};
use tokio::sync::broadcast;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Example content source directory.
    pub source_dir: PathBuf,
    /// Syntect theme for the light stylesheet.
    pub light_theme: String,
    /// Syntect theme for the dark stylesheet.
    pub dark_theme: String,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload.
    pub watch_patterns: Option<Vec<String>>,
    /// Debounce window for filesystem events, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let themes = PipelineConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 5173,
            source_dir: PathBuf::from("content"),
            light_theme: themes.light_theme,
            dark_theme: themes.dark_theme,
            live_reload_enabled: false,
            watch_patterns: None,
            debounce_ms: 150,
        }
    }
}

/// Run the server.
///
/// Pre-renders every registry entry into memory, then serves until a
/// shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the initial content build fails or the server
/// fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ExampleRegistry::builtin();
    let pipeline = ContentPipeline::new(PipelineConfig {
        light_theme: config.light_theme.clone(),
        dark_theme: config.dark_theme.clone(),
    })?;

    let builder = Arc::new(SiteBuilder::new(
        registry.clone(),
        pipeline,
        config.source_dir.clone(),
    ));
    let store = Arc::new(builder.build()?);

    // Create live reload manager if enabled
    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(
            config.source_dir.clone(),
            config.watch_patterns.clone(),
            Arc::clone(&builder),
            Arc::clone(&store),
            tx,
        )
        .with_debounce_ms(config.debounce_ms);
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        registry,
        store,
        live_reload,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from tabledocs config.
#[must_use]
pub fn server_config_from_config(config: &tabledocs_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.content_resolved.source_dir.clone(),
        light_theme: config.highlight.light_theme.clone(),
        dark_theme: config.highlight.dark_theme.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_patterns: config.live_reload.watch_patterns.clone(),
        debounce_ms: config.live_reload.debounce_ms,
    }
}
