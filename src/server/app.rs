use anyhow::Context;
use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{quizzes_router, results_router, ApiResponse};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerSettings;
use crate::store::SharedStore;

#[derive(FromRef, Clone)]
pub struct AppState {
    store: SharedStore,
}

pub fn build_router(store: SharedStore) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/metrics", get(metrics))
        .merge(quizzes_router(state.clone()))
        .merge(results_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(settings: ServerSettings, store: SharedStore) -> anyhow::Result<()> {
    let addr = settings.address();
    let app = build_router(store);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn metrics() -> ApiResponse<Response> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder
        .encode(&metrics, &mut buf)
        .context("Cannot encode metrics")?;
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .context("Cannot build metrics response")?;
    Ok(response)
}
