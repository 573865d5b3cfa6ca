//! HTTP server implementation

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::knowledge::KnowledgeBase;
use crate::query::EntityExtractor;
use crate::query::QueryDispatcher;
use crate::rag::RagService;
use crate::store::TransactionStore;
use crate::Result;

/// Build the shared state: dispatcher plus RAG service over one store
pub async fn build_state(config: &AppConfig, store: Arc<TransactionStore>) -> Result<AppState> {
    let knowledge_base = KnowledgeBase::builtin();
    let rag = RagService::new(config, store.clone(), &knowledge_base).await?;
    let dispatcher = QueryDispatcher::new(store.clone(), EntityExtractor::new(knowledge_base));

    Ok(AppState {
        store,
        dispatcher: Arc::new(dispatcher),
        rag: Arc::new(rag),
    })
}

/// Router with middleware; `/health` is also served at the root
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .with_state(state.clone())
        .nest("/api", routes::api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        );

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }
    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, state: AppState) -> Result<()> {
    info!("Starting chainrag API server...");

    let app = create_router(state, config.server.cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health                           - Health check");
    info!("  GET  /api/stats                        - Dataset statistics");
    info!("  GET  /api/transactions                 - Paged transactions");
    info!("  GET  /api/analytics/<chart>            - Chart data");
    info!("  GET  /api/query?q=...                  - Rule-based query");
    info!("  POST /api/rag/query                    - RAG query");
    info!("  GET  /api/rag/stats                    - RAG performance");

    axum::serve(listener, app).await?;

    Ok(())
}
