//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set/:key?ttl=<secs>` - Store the request body under a key
/// - `GET /get/:key` - Retrieve the raw value of a key
/// - `DELETE /del/:key` - Delete a key
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set/:key", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEngine;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn status_of(app: &Router, method: Method, uri: &str, body: &'static str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_each_route_is_mounted() {
        let app = create_router(AppState::new(CacheEngine::new(8)));

        assert_eq!(status_of(&app, Method::PUT, "/set/k?ttl=60", "v").await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::GET, "/get/k", "").await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::DELETE, "/del/k", "").await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::GET, "/stats", "").await, StatusCode::OK);
        assert_eq!(status_of(&app, Method::GET, "/health", "").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let app = create_router(AppState::new(CacheEngine::new(8)));

        assert_eq!(
            status_of(&app, Method::GET, "/set/k", "").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            status_of(&app, Method::POST, "/get/k", "").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_key_round_trips() {
        let app = create_router(AppState::new(CacheEngine::new(8)));

        assert_eq!(
            status_of(&app, Method::PUT, "/set/user%2F42", "v").await,
            StatusCode::OK
        );
        assert_eq!(status_of(&app, Method::GET, "/get/user%2F42", "").await, StatusCode::OK);
        assert_eq!(
            status_of(&app, Method::GET, "/get/user", "").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_router(AppState::new(CacheEngine::new(8)));

        assert_eq!(status_of(&app, Method::GET, "/keys", "").await, StatusCode::NOT_FOUND);
    }
}
