//! Jobs endpoint and the job-completion waiter.

use std::time::Duration;

use ctrlplane_core::retry::{Retry, StillPending};
use serde::Deserialize;

use super::Resource;
use crate::{
    client::Client,
    error::{Error, Result},
    types::{JobAttributes, JobState, ResourceKind, ResourceObject},
};

/// A job resource with parsed attributes.
pub type Job = ResourceObject<JobAttributes>;

/// Default interval between job polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default deadline for a job to reach a terminal state.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(3600);

/// Jobs API resource.
///
/// Jobs are created by the service as a side effect of other operations
/// and are read-only through the API; there is no update or delete.
#[derive(Clone)]
pub struct Jobs {
    client: Client,
}

impl Jobs {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a job by id.
    pub async fn get(&self, job_id: &str) -> Result<Job> {
        let document = self.client.detail(ResourceKind::Job, job_id, &[]).await?;
        Ok(document.data)
    }

    /// List all jobs.
    pub async fn list(&self) -> Result<Vec<Job>> {
        let document = self.client.list(ResourceKind::Job, &[]).await?;
        Ok(document.data)
    }

    /// Wait for a job to reach a terminal state, with the default polling
    /// cadence (every 30 seconds, up to an hour).
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<()> {
        self.wait_for_completion_with(job_id, DEFAULT_POLL_INTERVAL, DEFAULT_COMPLETION_TIMEOUT)
            .await
    }

    /// Wait for a job to reach a terminal state, polling every
    /// `poll_interval` until `timeout`.
    ///
    /// Each poll fetches the job fresh; a non-terminal state keeps the
    /// retry loop going. Returns `Ok(())` only when the job completes
    /// successfully:
    ///
    /// - `failed` or `canceled` fails with [`Error::JobFailed`], carrying
    ///   the job id, the terminal state, and whatever `message`/`status`
    ///   could be extracted from the job's result payload.
    /// - No terminal state before the deadline fails with
    ///   [`Error::RetryExhausted`], carrying the last pending state.
    ///
    /// The deadline only stops new polls and sleeps; a fetch already in
    /// flight when it passes runs to completion.
    pub async fn wait_for_completion_with(
        &self,
        job_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<()> {
        let retry = Retry::fixed(poll_interval).timeout(timeout).verbose(true);

        let (state, result) = retry
            .call("verify_job_in_terminal_state", || async move {
                let job = self.get(job_id).await?;
                let state = job.attributes.state;
                if !state.is_terminal() {
                    return Err(Error::JobPending(
                        StillPending::new("waiting for job completion")
                            .with_field("job_id", job_id)
                            .with_field("job_state", state),
                    ));
                }
                Ok((state, job.attributes.result))
            })
            .await?;

        if state != JobState::Completed {
            return Err(job_failure(job_id, state, &result));
        }

        tracing::info!(job_id, "job completed successfully");
        Ok(())
    }
}

impl Resource for Jobs {
    fn client(&self) -> &Client {
        &self.client
    }
}

/// The structure failed jobs usually encode in their `result` string.
#[derive(Debug, Deserialize)]
struct JobResultPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<serde_json::Value>,
}

/// Build the terminal-failure error, extracting `message` and `status`
/// from the result payload on a best-effort basis. An unparseable result
/// degrades to the bare id-and-state message, never to a second error.
fn job_failure(job_id: &str, state: JobState, result: &str) -> Error {
    let (message, status) = match serde_json::from_str::<JobResultPayload>(result) {
        Ok(payload) => {
            let status = payload.status.as_ref().and_then(|status| match status {
                serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            });
            (payload.message, status)
        }
        Err(_) => (None, None),
    };

    Error::JobFailed {
        job_id: job_id.to_string(),
        state,
        message,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failure_extracts_message_and_status() {
        let err = job_failure(
            "j-1",
            JobState::Failed,
            r#"{"message": "disk full", "status": 507}"#,
        );

        assert_eq!(
            err.to_string(),
            "Job j-1 failed with state: failed, message: disk full, status: 507"
        );
    }

    #[test]
    fn test_job_failure_message_only() {
        let err = job_failure("j-1", JobState::Canceled, r#"{"message": "stopped"}"#);

        assert_eq!(
            err.to_string(),
            "Job j-1 failed with state: canceled, message: stopped"
        );
    }

    #[test]
    fn test_job_failure_status_as_string() {
        let err = job_failure(
            "j-1",
            JobState::Failed,
            r#"{"message": "denied", "status": "403"}"#,
        );

        match err {
            Error::JobFailed { status, .. } => assert_eq!(status, Some(403)),
            other => panic!("Expected JobFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_job_failure_unparseable_result_falls_back() {
        let err = job_failure("j-1", JobState::Failed, "plain text result");

        assert_eq!(err.to_string(), "Job j-1 failed with state: failed");
        match err {
            Error::JobFailed {
                message, status, ..
            } => {
                assert_eq!(message, None);
                assert_eq!(status, None);
            }
            other => panic!("Expected JobFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_job_failure_empty_result_falls_back() {
        let err = job_failure("j-1", JobState::Canceled, "");

        assert_eq!(err.to_string(), "Job j-1 failed with state: canceled");
    }
}
