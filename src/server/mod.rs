// SPDX-License-Identifier: MIT

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;

use crate::query::{compile, QueryBuilder, QueryDefinition};

/// Level of the per-request spans and response events
const REQUEST_LEVEL: Level = Level::INFO;

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/compile", post(compile_definition))
        .route("/api/validate", post(validate_definition))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(REQUEST_LEVEL))
                .on_response(DefaultOnResponse::new().level(REQUEST_LEVEL)),
        )
        .layer(CorsLayer::permissive())
}

/// Filter for the server's tracing output. Uses `directives` (normally
/// `RUST_LOG`) when they parse, otherwise shows request traces.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| match EnvFilter::try_new(d) {
            Ok(filter) => Some(filter),
            Err(e) => {
                log::warn!("Ignoring invalid RUST_LOG {:?}: {}", d, e);
                None
            }
        })
        .unwrap_or_else(|| EnvFilter::new("info"))
}

pub fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

pub async fn serve(port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn compile_definition(Json(def): Json<QueryDefinition>) -> (StatusCode, Json<Value>) {
    match compile(&def.expressions, &def.conditions).await {
        Ok(query) => (StatusCode::OK, Json(json!({ "query": query }))),
        Err(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "rejected" })),
        ),
    }
}

async fn validate_definition(Json(def): Json<QueryDefinition>) -> (StatusCode, Json<Value>) {
    match QueryBuilder::new()
        .check(&def.expressions, &def.conditions)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "valid": true }))),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "valid": false, "error": e.to_string() })),
        ),
    }
}
