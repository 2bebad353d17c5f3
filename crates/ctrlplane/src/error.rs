//! Error types for the ctrlplane SDK.
//!
//! One public `Error` enum covers transport failures, API status errors
//! parsed from the service's JSON:API error envelope, retry exhaustion,
//! and terminal job failures.

use std::time::Duration;

use thiserror::Error;

use crate::types::JobState;
pub use ctrlplane_core::retry::{RetryExhausted, StillPending};

/// Result type alias for operations that can fail with an SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ctrlplane SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// API returned a bad request error (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed (401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Permission denied (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Conflict error (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500+).
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// Generic API error for status codes not covered above.
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message assembled from the response's `errors` array.
        message: String,
        /// Server-side correlation id from `meta.ctx`, if present.
        ctx: Option<String>,
    },

    /// Failed to deserialize an API response.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// A polled job has not reached a terminal state yet.
    ///
    /// Internal to retry rounds; never surfaced past the job waiter.
    #[error("{0}")]
    JobPending(#[from] StillPending),

    /// A job reached `failed` or `canceled`.
    #[error("{}", render_job_failure(.job_id, .state, .message, .status))]
    JobFailed {
        /// The job's identifier.
        job_id: String,
        /// The terminal state it reached.
        state: JobState,
        /// Human-readable message extracted from the job result, if the
        /// result was parseable.
        message: Option<String>,
        /// Status code extracted from the job result, if present.
        status: Option<u16>,
    },

    /// An app services apply ended in a state other than `ready`.
    #[error("app services apply ended in state '{0}' instead of 'ready'")]
    ApplyFailed(String),

    /// A retried operation did not complete before its deadline.
    #[error("{0}")]
    RetryExhausted(#[from] RetryExhausted),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description.
        context: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an API error from an HTTP response status and body.
    ///
    /// Bodies that parse as the service's JSON:API error envelope
    /// contribute their `errors` array and `meta.ctx`; anything else falls
    /// back to the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, ctx) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if !envelope.errors.is_empty() => {
                let message = envelope
                    .errors
                    .iter()
                    .map(ErrorObject::render)
                    .collect::<Vec<_>>()
                    .join("; ");
                (message, envelope.meta.and_then(|meta| meta.ctx_string()))
            }
            _ => (body.to_string(), None),
        };

        match status {
            400 => Error::BadRequest(message),
            401 => Error::Authentication(message),
            403 => Error::PermissionDenied(message),
            404 => Error::NotFound(message),
            409 => Error::Conflict(message),
            s if s >= 500 => Error::InternalServerError(message),
            _ => Error::ApiError {
                status,
                message,
                ctx,
            },
        }
    }

    /// Check if this error is retryable at the transport layer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::InternalServerError(_) => true,
            Error::Connection(_) => true,
            Error::Timeout(_) => true,
            Error::ApiError { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }
}

fn render_job_failure(
    job_id: &str,
    state: &JobState,
    message: &Option<String>,
    status: &Option<u16>,
) -> String {
    let mut rendered = format!("Job {job_id} failed with state: {state}");
    if let Some(message) = message {
        rendered.push_str(&format!(", message: {message}"));
    }
    if let Some(status) = status {
        rendered.push_str(&format!(", status: {status}"));
    }
    rendered
}

// Helper structures for parsing the API error envelope

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorObject>,
    #[serde(default)]
    meta: Option<ErrorMeta>,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorObject {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ErrorObject {
    fn render(&self) -> String {
        match (&self.detail, &self.title) {
            (Some(detail), _) => detail.clone(),
            (None, Some(title)) => title.clone(),
            (None, None) => self
                .status
                .map(|status| format!("status {status}"))
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorMeta {
    #[serde(default)]
    ctx: Option<serde_json::Value>,
}

impl ErrorMeta {
    fn ctx_string(&self) -> Option<String> {
        self.ctx.as_ref().map(|ctx| match ctx {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_parsing_by_status() {
        let body = r#"{"errors":[{"status":409,"detail":"user already exists"}],"meta":{"ctx":123}}"#;

        match Error::from_response(409, body) {
            Error::Conflict(message) => assert_eq!(message, "user already exists"),
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_error_envelope_unmapped_status_keeps_ctx() {
        let body = r#"{"errors":[{"status":422,"detail":"bad attribute"}],"meta":{"ctx":"abc"}}"#;

        match Error::from_response(422, body) {
            Error::ApiError {
                status,
                message,
                ctx,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad attribute");
                assert_eq!(ctx.as_deref(), Some("abc"));
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_fallback_on_unparseable_body() {
        match Error::from_response(500, "upstream exploded") {
            Error::InternalServerError(message) => assert_eq!(message, "upstream exploded"),
            other => panic!("Expected InternalServerError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_multiple_error_objects_joined() {
        let body = r#"{"errors":[{"detail":"first"},{"detail":"second"}]}"#;

        match Error::from_response(400, body) {
            Error::BadRequest(message) => assert_eq!(message, "first; second"),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_error_title_fallback_when_no_detail() {
        let body = r#"{"errors":[{"status":401,"title":"Unauthorized"}]}"#;

        match Error::from_response(401, body) {
            Error::Authentication(message) => assert_eq!(message, "Unauthorized"),
            other => panic!("Expected Authentication, got {other:?}"),
        }
    }

    #[test]
    fn test_is_retryable_classification() {
        assert!(Error::InternalServerError("boom".to_string()).is_retryable());
        assert!(Error::Connection("reset".to_string()).is_retryable());
        assert!(Error::Timeout(Duration::from_secs(60)).is_retryable());
        assert!(
            Error::ApiError {
                status: 503,
                message: "unavailable".to_string(),
                ctx: None,
            }
            .is_retryable()
        );

        assert!(!Error::NotFound("gone".to_string()).is_retryable());
        assert!(!Error::Authentication("nope".to_string()).is_retryable());
        assert!(!Error::Conflict("dup".to_string()).is_retryable());
    }

    #[test]
    fn test_job_failed_message_composition() {
        let bare = Error::JobFailed {
            job_id: "j-1".to_string(),
            state: JobState::Failed,
            message: None,
            status: None,
        };
        assert_eq!(bare.to_string(), "Job j-1 failed with state: failed");

        let full = Error::JobFailed {
            job_id: "j-1".to_string(),
            state: JobState::Canceled,
            message: Some("operator canceled".to_string()),
            status: Some(409),
        };
        assert_eq!(
            full.to_string(),
            "Job j-1 failed with state: canceled, message: operator canceled, status: 409"
        );
    }

    #[test]
    fn test_job_pending_is_reachable_in_source_chain() {
        use std::error::Error as _;

        let err = Error::JobPending(
            StillPending::new("waiting for job completion").with_field("job_id", "j-1"),
        );

        let source = err.source().expect("pending signal as source");
        assert!(source.downcast_ref::<StillPending>().is_some());
    }

    #[test]
    fn test_error_context_wrapping() {
        let err = Error::NotFound("user u-1".to_string()).context("Failed to get user");

        assert_eq!(
            err.to_string(),
            "Failed to get user: Resource not found: user u-1"
        );
    }
}
