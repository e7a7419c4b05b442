//! Navigation API endpoint.
//!
//! Resolves the current example plus its prev/next neighbors and the
//! pre-rendered README content. The context is recomputed per request.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use tabledocs_site::{NavigationContext, NavigationError, RegistryError, resolve_navigation};

use crate::error::ServerError;
use crate::handlers::to_url_path;
use crate::state::AppState;

/// Handle GET /api/navigation/{*path}.
pub(crate) async fn get_navigation(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationContext>, ServerError> {
    let url_path = to_url_path(&path);

    let context = resolve_navigation(&state.registry, &state.store, &url_path).map_err(
        |err| match err {
            NavigationError::Registry(RegistryError::NotFound(path)) => {
                ServerError::ExampleNotFound(path)
            }
            other => ServerError::Internal(other.to_string()),
        },
    )?;

    Ok(Json(context))
}
