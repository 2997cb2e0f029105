//! Router setup with routes and middleware.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use advisor_core::error::AdvisorError;

use crate::handlers;
use crate::state::AppState;

/// Build the router: public health check plus bearer-protected chat and
/// tool introspection.
pub fn create_router(state: AppState) -> Router {
    let port = state.config.server.port;
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", port),
        format!("http://localhost:{}", port),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let protected_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/tools", get(handlers::tools))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind to localhost on the configured port and serve until the process
/// exits.
pub async fn start_server(state: AppState) -> Result<(), AdvisorError> {
    let addr = format!("127.0.0.1:{}", state.config.server.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AdvisorError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| AdvisorError::Api(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{ChatResponse, HealthResponse, ToolsResponse};
    use advisor_analytics::AnalyticsService;
    use advisor_chat::client::ModelBackend;
    use advisor_chat::protocol::{
        Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    };
    use advisor_chat::{ChatDispatcher, ChatError, GeminiSettings, ModelKind, ToolRegistry};
    use advisor_core::config::AdvisorConfig;
    use advisor_store::Database;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubBackend;

    #[async_trait]
    impl ModelBackend for StubBackend {
        async fn generate(
            &self,
            _model: ModelKind,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, ChatError> {
            Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Content::model_text("stubbed reply"),
                    finish_reason: Some("STOP".to_string()),
                }],
            })
        }
    }

    fn test_state(api_key: &str) -> AppState {
        let db = Arc::new(Database::in_memory().unwrap());
        let registry = ToolRegistry::new(Arc::new(AnalyticsService::new(db)));
        let dispatcher = Arc::new(ChatDispatcher::new(
            Arc::new(StubBackend),
            registry,
            GeminiSettings::new(api_key, "Gemini 2.0 Flash"),
        ));
        AppState::new(AdvisorConfig::default(), dispatcher, "secret-token".to_string())
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = body_json(response).await;
        assert_eq!(health.status, "healthy");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_tools_requires_auth() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(Request::get("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tools_rejects_wrong_token() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(
                Request::get("/tools")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tools_lists_registry() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(
                Request::get("/tools")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let tools: ToolsResponse = body_json(response).await;
        assert!(tools.tools.contains(&"rfm_analysis".to_string()));
        assert!(tools.tools.contains(&"find_customers".to_string()));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(
                Request::post("/chat")
                    .header("authorization", "Bearer secret-token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "how are sales?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let chat: ChatResponse = body_json(response).await;
        assert_eq!(chat.reply, "stubbed reply");
    }

    #[tokio::test]
    async fn test_chat_empty_query_is_bad_request() {
        let router = create_router(test_state("key"));
        let response = router
            .oneshot(
                Request::post("/chat")
                    .header("authorization", "Bearer secret-token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_missing_credential_is_bad_request() {
        let router = create_router(test_state(""));
        let response = router
            .oneshot(
                Request::post("/chat")
                    .header("authorization", "Bearer secret-token")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
