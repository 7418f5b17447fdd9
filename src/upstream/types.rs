//! Upstream types — response envelope and errors for the generation API.

use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the generation API.
///
/// A non-2xx status is not an error here: it comes back as an
/// [`UpstreamResponse`] so routes can surface it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("upstream request failed: {0}")]
    Request(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The job never reached a terminal status within the attempt budget.
    #[error("generation job timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The job reached its failure status.
    #[error("generation job failed: {}", failure_reason(.body))]
    JobFailed { body: Value },
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Status code and JSON body of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable failure message: the body's `error` or `message`
    /// string when present, otherwise the body rendered as text.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Some(msg) = body_message(&self.body, &["error", "message"]) {
            return msg.to_string();
        }
        match &self.body {
            Value::String(text) => text.clone(),
            Value::Null => format!("upstream returned status {}", self.status),
            other => other.to_string(),
        }
    }
}

fn body_message<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| body.get(*key).and_then(Value::as_str))
}

/// Why a job failed: its `error`, `message` or `reason` string, else the
/// `status` value, else the whole body.
fn failure_reason(body: &Value) -> String {
    body_message(body, &["error", "message", "reason", "status"])
        .map_or_else(|| body.to_string(), str::to_string)
}

/// Decode a raw upstream body. Empty bodies become `null`; bodies that are
/// not JSON are kept as a JSON string so nothing is lost on the way back.
#[must_use]
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
