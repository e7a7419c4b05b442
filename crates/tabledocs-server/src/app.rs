//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route(
            "/api/user-profile/{n}",
            get(handlers::profiles::get_profiles),
        )
        .route("/api/examples", get(handlers::examples::get_examples))
        .route(
            "/api/navigation/{*path}",
            get(handlers::navigation::get_navigation),
        );

    let mut router = Router::new().merge(api_routes);

    // WebSocket for live reload
    if state.live_reload_enabled() {
        router = router.route("/ws/live-reload", get(live_reload::ws_handler));
    }

    // Request tracing plus security headers on every response
    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tabledocs_site::{ContentStore, ExampleRegistry, RenderedExample};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let registry = ExampleRegistry::builtin();
        let store = Arc::new(ContentStore::new());
        for entry in registry.entries() {
            store.replace(
                entry.pathname.clone(),
                RenderedExample {
                    html: format!("<h1>{}</h1>", entry.title),
                    title: Some(entry.title.clone()),
                },
            );
        }
        Arc::new(AppState {
            registry,
            store,
            live_reload: None,
        })
    }

    async fn get_response(uri: &str) -> Response {
        create_router(test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_user_profile_returns_requested_count() {
        let response = get_response("/api/user-profile/3").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let profiles = json.as_array().unwrap();
        assert_eq!(profiles.len(), 3);
        for profile in profiles {
            assert!(profile["id"].is_string());
            let age = profile["age"].as_u64().unwrap();
            assert!((18..=99).contains(&age));
            assert!(profile["email"].as_str().unwrap().contains('@'));
            assert!(profile.get("friends").is_none());
        }
    }

    #[tokio::test]
    async fn test_user_profile_rejects_non_numeric_count() {
        let response = get_response("/api/user-profile/abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_text(response).await;
        assert_eq!(body, "Expected a number, but received 'abc'");
    }

    #[tokio::test]
    async fn test_user_profile_with_friends() {
        let response = get_response("/api/user-profile/2?nFriends=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let profiles = json.as_array().unwrap();
        assert_eq!(profiles.len(), 2);
        for profile in profiles {
            let friends = profile["friends"].as_array().unwrap();
            assert_eq!(friends.len(), 1);
            // Friends never have friends of their own
            assert!(friends[0].get("friends").is_none());
        }
    }

    #[tokio::test]
    async fn test_user_profile_rejects_non_numeric_friends() {
        let response = get_response("/api/user-profile/2?nFriends=lots").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_text(response).await;
        assert_eq!(body, "Expected a number, but received 'lots'");
    }

    #[tokio::test]
    async fn test_examples_lists_registry() {
        let response = get_response("/api/examples").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let examples = json["examples"].as_array().unwrap();
        assert!(!examples.is_empty());
        assert_eq!(examples[0]["id"], "basic");
        assert_eq!(examples[0]["pathname"], "/examples/basic");
    }

    #[tokio::test]
    async fn test_navigation_resolves_entry() {
        let response = get_response("/api/navigation/examples/basic").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["currentExample"]["id"], "basic");
        assert!(json.get("previousExample").is_none());
        assert_eq!(json["nextExample"]["id"], "reactive-data");
        assert_eq!(json["renderedContent"], "<h1>Basic Table</h1>");
    }

    #[tokio::test]
    async fn test_navigation_miss_is_404() {
        let response = get_response("/api/navigation/examples/does-not-exist").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = get_response("/api/examples").await;

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(
            headers["content-security-policy"]
                .to_str()
                .unwrap()
                .contains("default-src 'self'")
        );
    }

    #[tokio::test]
    async fn test_ws_route_absent_without_live_reload() {
        let response = get_response("/ws/live-reload").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
