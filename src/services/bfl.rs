use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::models::edit::{EditRequest, OutputFormat};
use crate::models::job::{JobHandle, JobStatus, PollResponse, SubmitResponse};
use crate::services::transport::HttpTransport;

/// Client for the BFL.ai Flux Kontext image-edit API.
///
/// Drives one edit job from submission to final image bytes: a single POST
/// creates the job, a bounded fixed-interval poll loop watches it, and a
/// final unauthenticated GET downloads the result. All polling mechanics
/// are hidden from the caller; per invocation the worst-case wall clock is
/// `max_polls * poll_interval` plus submission and fetch latency.
pub struct BflClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    api_key: String,
    output_format: OutputFormat,
    safety_tolerance: u8,
    max_polls: u32,
    poll_interval: Duration,
}

impl BflClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        api_url: String,
        api_key: String,
        output_format: OutputFormat,
        safety_tolerance: u8,
        max_polls: u32,
        poll_interval: Duration,
    ) -> Self {
        Self {
            transport,
            api_url,
            api_key,
            output_format,
            safety_tolerance,
            max_polls,
            poll_interval,
        }
    }

    /// Run one edit job to completion.
    ///
    /// Every failure collapses to an [`EditError`]; only transport errors on
    /// individual poll attempts are retried (up to the overall poll budget).
    /// Submission and result fetch are never retried.
    pub async fn edit(
        &self,
        image_bytes: &[u8],
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Vec<u8>, EditError> {
        let handle = self.submit(image_bytes, prompt, aspect_ratio).await?;
        let sample_url = self.poll_until_ready(&handle).await?;
        self.fetch_result(&handle, &sample_url).await
    }

    /// Submit the edit request and return the job handle.
    async fn submit(
        &self,
        image_bytes: &[u8],
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<JobHandle, EditError> {
        let request = EditRequest::new(
            image_bytes,
            prompt,
            aspect_ratio,
            self.output_format,
            self.safety_tolerance,
        );
        let body = serde_json::to_value(&request)
            .map_err(|e| EditError::SubmissionFailed(e.to_string()))?;

        tracing::info!(aspect_ratio, "Submitting edit job");

        let response = self
            .transport
            .post_json(&self.api_url, &self.api_key, &body)
            .await
            .map_err(|e| EditError::SubmissionFailed(e.to_string()))?;

        let submit: SubmitResponse = serde_json::from_value(response)
            .map_err(|e| EditError::SubmissionFailed(e.to_string()))?;

        let polling_url = submit.polling_url.ok_or_else(|| {
            EditError::SubmissionFailed("no polling URL in submission response".to_string())
        })?;
        let id = submit.id.unwrap_or_else(|| "unknown".to_string());

        tracing::info!(job_id = %id, "Edit job created, polling for result");

        Ok(JobHandle { id, polling_url })
    }

    /// Poll the job until a terminal state, returning the result URL on
    /// `Ready`. Each iteration waits the configured interval first, so a
    /// job that is ready on the first poll still costs one interval.
    async fn poll_until_ready(&self, handle: &JobHandle) -> Result<String, EditError> {
        for poll_count in 1..=self.max_polls {
            sleep(self.poll_interval).await;

            let response = match self
                .transport
                .get_json(&handle.polling_url, &self.api_key)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    // Transient: this attempt is lost but the budget covers it.
                    tracing::warn!(job_id = %handle.id, poll = poll_count, error = %e, "Poll attempt failed");
                    continue;
                }
            };

            let poll: PollResponse = match serde_json::from_value(response) {
                Ok(poll) => poll,
                Err(e) => {
                    tracing::warn!(job_id = %handle.id, poll = poll_count, error = %e, "Malformed poll response");
                    continue;
                }
            };

            tracing::debug!(job_id = %handle.id, poll = poll_count, status = %poll.status, "Polled job status");

            match JobStatus::classify(&poll.status) {
                JobStatus::Ready => {
                    return poll.result.and_then(|r| r.sample).ok_or_else(|| {
                        EditError::ResultFetchFailed(
                            "no image URL in ready response".to_string(),
                        )
                    });
                }
                JobStatus::Failed => {
                    let reason = poll
                        .failure_reason
                        .unwrap_or_else(|| "Unknown error".to_string());
                    tracing::error!(job_id = %handle.id, reason = %reason, "Edit job failed");
                    return Err(EditError::JobFailed(reason));
                }
                JobStatus::Pending | JobStatus::Unknown => continue,
            }
        }

        tracing::error!(job_id = %handle.id, max_polls = self.max_polls, "Edit job timed out");
        Err(EditError::JobTimedOut(self.max_polls))
    }

    /// Download the finished image from the result URL.
    async fn fetch_result(&self, handle: &JobHandle, sample_url: &str) -> Result<Vec<u8>, EditError> {
        let bytes = self
            .transport
            .get_bytes(sample_url)
            .await
            .map_err(|e| EditError::ResultFetchFailed(e.to_string()))?;

        tracing::info!(job_id = %handle.id, bytes = bytes.len(), "Retrieved edited image");
        Ok(bytes)
    }
}

/// Terminal failure of one edit job. All four kinds collapse to "no result"
/// for the caller; they are distinguished only in logs.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    #[error("edit job failed: {0}")]
    JobFailed(String),

    #[error("edit job timed out after {0} polls")]
    JobTimedOut(u32),

    #[error("failed to fetch edited image: {0}")]
    ResultFetchFailed(String),
}
