use axum::{
    body::Bytes,
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use inference::ResponseCache;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub review: Option<Value>,
}

impl PredictRequest {
    /// The review text. Falsy JSON values (`null`, `false`, `0`, `""`, `[]`, `{}`)
    /// mean no review was given; any other non-string is a malformed body.
    pub fn into_review(self) -> Result<Option<String>, ApiError> {
        match self.review {
            Some(Value::String(text)) => Ok(Some(text)),
            Some(value) if !is_falsy(&value) => Err(ApiError::bad_request(format!(
                "Invalid request body: review must be a string, got {}",
                value
            ))),
            _ => Ok(None),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Create the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tracing::instrument(skip(state, body))]
async fn predict(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let key = ResponseCache::request_key(path_and_query, &body);

    if let Some(cached) = state.service.cached_response(&key) {
        tracing::debug!("Serving cached prediction");
        return Ok(json_response(&cached));
    }

    let request: PredictRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
    let review = request.into_review()?;

    let service = Arc::clone(&state.service);
    let response = tokio::task::spawn_blocking(move || service.respond(key, review.as_deref()))
        .await
        .map_err(|e| ApiError::internal(format!("Prediction task failed: {}", e)))??;

    Ok(json_response(&response))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

fn json_response(body: &[u8]) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body.to_vec()).into_response()
}
