//! Example registry API endpoint.
//!
//! Returns the full list of example entries in registry order.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tabledocs_site::ExampleEntry;

use crate::state::AppState;

/// Response for GET /api/examples.
#[derive(Serialize)]
pub(crate) struct ExamplesResponse {
    /// Example entries in registry order.
    examples: Vec<ExampleEntry>,
}

/// Handle GET /api/examples.
pub(crate) async fn get_examples(State(state): State<Arc<AppState>>) -> Json<ExamplesResponse> {
    let examples = state.registry.entries().to_vec();
    Json(ExamplesResponse { examples })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_response_serialization() {
        let response = ExamplesResponse {
            examples: vec![ExampleEntry::new("basic", "Basic Table")],
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["examples"][0]["id"], "basic");
        assert_eq!(json["examples"][0]["pathname"], "/examples/basic");
    }
}
