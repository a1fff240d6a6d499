//! `POST /api/places`: run one place search.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use placefinder_core::{ResultSet, SearchRequest, MIN_PROMPT_CHARS};
use placefinder_llm::LlmError;
use placefinder_pipeline::PipelineError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PlacesRequest {
    pub prompt: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Responds with `{ queries, radius }`.
pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<PlacesRequest>, JsonRejection>,
) -> Result<Json<ResultSet>, ApiError> {
    let rid = &req_id.0;

    let Json(body) = body.map_err(|rejection| {
        let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "validation_error"
        };
        ApiError::new(rid, code, rejection.body_text())
    })?;

    let request = SearchRequest::from_parts(body.prompt, body.longitude, body.latitude);
    if !request.has_valid_prompt() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("prompt must be at least {MIN_PROMPT_CHARS} characters"),
        ));
    }

    match state.pipeline.run(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err(map_pipeline_error(rid, &e)),
    }
}

fn map_pipeline_error(request_id: &str, error: &PipelineError) -> ApiError {
    let PipelineError::Completion(llm) = error;
    match llm {
        LlmError::Configuration | LlmError::Http(_) => {
            tracing::error!(error = %llm, "completion client misconfigured");
            ApiError::new(request_id, "internal_error", "search is not configured")
        }
        LlmError::Auth => {
            tracing::error!(error = %llm, "completion provider rejected credentials");
            ApiError::new(request_id, "upstream_auth", llm.to_string())
        }
        LlmError::PayloadTooLarge => {
            ApiError::new(request_id, "payload_too_large", llm.to_string())
        }
        LlmError::Completion { .. } => {
            tracing::warn!(error = %llm, "completion failed");
            ApiError::new(request_id, "upstream_error", llm.to_string())
        }
    }
}
