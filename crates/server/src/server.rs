use ai_parser::TransactionParser;
use axum::{
    Router,
    extract::{DefaultBodyLimit, MatchedPath, Request},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{analytics, categories, import, transactions};
use engine::Engine;

/// Multipart bodies carry a 10MB image plus form overhead.
const BODY_LIMIT: usize = 12 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub parser: Arc<dyn TransactionParser>,
}

/// Every route lives under `/api`.
pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", get(categories::get))
        .route("/ai-import", post(import::text))
        .route("/ai-import/image", post(import::image))
        .route("/analytics/summary", get(analytics::summary))
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    Router::new()
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request| {
                let method = req.method();
                let uri = req.uri();
                let matched_path = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|matched_path| matched_path.as_str());

                tracing::debug_span!("request", %method, %uri, matched_path)
            }),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    parser: Arc<dyn TransactionParser>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        parser,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    parser: Arc<dyn TransactionParser>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, parser, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
