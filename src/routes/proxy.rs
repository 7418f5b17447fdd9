//! Proxy routes — forward prompt and image payloads to the generation API.
//!
//! DESIGN
//! ======
//! Handlers pull the fields they need to build the upstream path, check the
//! required ones are present, and forward the remaining JSON object as-is.
//! Successful upstream responses come back with their status and body
//! untouched. Failures collapse into `{ "error": string }`:
//!
//! - missing field or unreadable body → 400
//! - upstream non-2xx → the upstream status
//! - anything that threw (transport, poll timeout, failed job) → 500

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::services::poll::{JobState, poll_job};
use crate::state::AppState;
use crate::upstream::types::{UpstreamError, UpstreamResponse};

type Body = Map<String, Value>;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug)]
pub enum ProxyError {
    /// A required field was missing or the body was not a JSON object.
    BadRequest(String),
    /// The upstream answered with a non-success status.
    Upstream(UpstreamResponse),
    /// The upstream call threw.
    Failed(UpstreamError),
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        Self::Failed(err)
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Upstream(resp) => {
                let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, resp.error_message())
            }
            Self::Failed(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/prompt` — submit a prompt to a stream and wait for the job.
pub async fn prompt(
    State(state): State<AppState>,
    body: Result<Json<Body>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let Json(mut body) = body?;
    let stream_id = take_required(&mut body, "streamId")?;
    require(&body, "prompt")?;

    let path = format!("/streams/{}/prompts", urlencoding::encode(&stream_id));
    info!(%stream_id, "proxy: submitting prompt");
    let submitted = state.api.post_json(&path, &Value::Object(body)).await?;
    if !submitted.is_success() {
        warn!(%stream_id, status = submitted.status, "proxy: prompt submission rejected");
        return Err(ProxyError::Upstream(submitted));
    }
    if JobState::from_body(&submitted.body) == JobState::Failed {
        warn!(%stream_id, "proxy: prompt job failed on submission");
        return Err(UpstreamError::JobFailed { body: submitted.body }.into());
    }

    let result = match pending_job_id(&submitted.body) {
        Some(job_id) => {
            let job_path = format!("{path}/{}", urlencoding::encode(&job_id));
            info!(%stream_id, %job_id, "proxy: polling prompt job");
            poll_job(state.api.as_ref(), &job_path, state.poll).await?
        }
        None => submitted,
    };

    passthrough(result)
}

/// `POST /api/enhance` — forward a sketch image and prompt for enhancement.
pub async fn enhance(
    State(state): State<AppState>,
    body: Result<Json<Body>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let Json(mut body) = body?;
    let stream_id = take_required(&mut body, "streamId")?;
    require(&body, "prompt")?;
    require(&body, "image")?;

    let path = format!("/streams/{}/enhance", urlencoding::encode(&stream_id));
    info!(%stream_id, "proxy: forwarding enhance request");
    passthrough(state.api.post_json(&path, &Value::Object(body)).await?)
}

/// `POST /api/generate` — one-shot image generation from a prompt.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<Body>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let Json(body) = body?;
    require(&body, "prompt")?;

    info!(has_image = body.contains_key("image"), "proxy: forwarding generate request");
    passthrough(state.api.post_json("/generate", &Value::Object(body)).await?)
}

/// `GET /api/streams/:id` — look up a stream's state.
pub async fn stream_status(
    State(state): State<AppState>,
    Path(stream_id): Path<String>,
) -> Result<Response, ProxyError> {
    let path = format!("/streams/{}", urlencoding::encode(&stream_id));
    passthrough(state.api.get_json(&path).await?)
}

// =============================================================================
// HELPERS
// =============================================================================

fn passthrough(resp: UpstreamResponse) -> Result<Response, ProxyError> {
    if !resp.is_success() {
        return Err(ProxyError::Upstream(resp));
    }
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(resp.body)).into_response())
}

fn non_empty_str(body: &Body, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn require(body: &Body, field: &str) -> Result<(), ProxyError> {
    non_empty_str(body, field)
        .map(|_| ())
        .ok_or_else(|| ProxyError::BadRequest(format!("{field} is required")))
}

/// Remove a required string field from the forwarded body.
fn take_required(body: &mut Body, field: &str) -> Result<String, ProxyError> {
    let value = non_empty_str(body, field).ok_or_else(|| ProxyError::BadRequest(format!("{field} is required")))?;
    body.remove(field);
    Ok(value)
}

/// Job id to poll, if the submission reply describes an unfinished job.
fn pending_job_id(body: &Value) -> Option<String> {
    if JobState::from_body(body).is_terminal() {
        return None;
    }
    match body.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
