//! Poll service — fixed-interval status polling for generation jobs.
//!
//! DESIGN
//! ======
//! After a prompt is submitted, the job is re-requested every `interval`
//! until its `status` field reaches a terminal value or `max_attempts`
//! requests have been made. Linear: no backoff, no jitter, and the caller
//! cannot cancel. The initiating request handler waits for the whole loop.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::upstream::GenerationApi;
use crate::upstream::types::{UpstreamError, UpstreamResponse};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self { interval: config.poll_interval, max_attempts: config.poll_max_attempts }
    }
}

/// Where a job stands according to its `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Succeeded,
    Failed,
}

impl JobState {
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let Some(status) = body.get("status").and_then(Value::as_str) else {
            return Self::Pending;
        };
        match status.to_ascii_lowercase().as_str() {
            "completed" | "succeeded" | "success" => Self::Succeeded,
            "failed" | "error" | "cancelled" => Self::Failed,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `GET path` until the job is terminal.
///
/// A non-2xx response stops the loop and is returned unchanged so the
/// caller can surface it as an upstream failure.
///
/// # Errors
///
/// - `Timeout` if no terminal status is seen within `max_attempts`.
/// - `JobFailed` if the job reports its failure status.
/// - Transport errors from the client.
pub async fn poll_job(
    api: &dyn GenerationApi,
    path: &str,
    policy: PollPolicy,
) -> Result<UpstreamResponse, UpstreamError> {
    for attempt in 1..=policy.max_attempts {
        let response = api.get_json(path).await?;
        if !response.is_success() {
            warn!(%path, attempt, status = response.status, "poll: upstream returned error status");
            return Ok(response);
        }

        match JobState::from_body(&response.body) {
            JobState::Succeeded => {
                info!(%path, attempt, "poll: job completed");
                return Ok(response);
            }
            JobState::Failed => {
                warn!(%path, attempt, "poll: job failed");
                return Err(UpstreamError::JobFailed { body: response.body });
            }
            JobState::Pending => {
                debug!(%path, attempt, "poll: job pending");
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    warn!(%path, attempts = policy.max_attempts, "poll: attempt budget exhausted");
    Err(UpstreamError::Timeout { attempts: policy.max_attempts })
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;
