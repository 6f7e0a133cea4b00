use std::future::Future;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use calc_core::Operator;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::{debug, info};

use crate::wire::{ErrorResponse, OperandsRequest, ResultResponse};

/// Span maker that tags each request with a fresh request ID
#[derive(Clone)]
struct RequestIdMakeSpan;

impl<B> MakeSpan<B> for RequestIdMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> tracing::Span {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

// Routes that can be mounted into any axum router
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/{operation}", post(evaluate_operation))
}

/// Serve the arithmetic API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(RequestIdMakeSpan));

    info!(addr = %listener.local_addr()?, "arithmetic backend listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("arithmetic backend stopped");
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

async fn evaluate_operation(
    Path(operator): Path<Operator>,
    Json(req): Json<OperandsRequest>,
) -> Response {
    match operator.apply(req.a, req.b) {
        Ok(result) => {
            debug!(operation = operator.name(), a = req.a, b = req.b, result, "evaluated");
            (StatusCode::OK, Json(ResultResponse { result })).into_response()
        }
        Err(e) => {
            debug!(operation = operator.name(), a = req.a, b = req.b, error = %e, "rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::from(&e)),
            )
                .into_response()
        }
    }
}
