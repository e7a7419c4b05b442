//! Live reload support.
//!
//! Watches the content directory, re-renders changed example READMEs, and
//! notifies connected browsers over WebSocket.

mod debouncer;
mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::ws_handler;
