use serde::Deserialize;

/// Classified state of a remote edit job.
///
/// `Unknown` is the budget-exhausted terminal; it is never produced by
/// [`JobStatus::classify`], only by the poll loop when it runs out of
/// attempts without seeing `Ready` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Ready,
    Failed,
    Unknown,
}

impl JobStatus {
    /// Map the wire `status` string onto a job state.
    ///
    /// Only `Ready`, `Failed`, and `Error` are recognized terminals; every
    /// other string (including ones this client has never seen) is treated
    /// as `Pending` so that new intermediate states the service introduces
    /// keep the poll loop alive instead of aborting the job. Intentionally
    /// permissive.
    pub fn classify(status: &str) -> Self {
        match status {
            "Ready" => JobStatus::Ready,
            "Failed" | "Error" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

/// Handle returned by a successful submission; lives for one edit call.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Opaque request id, used only for log correlation.
    pub id: String,
    /// URL queried for status until the job reaches a terminal state.
    pub polling_url: String,
}

/// Wire response to the submission POST.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub polling_url: Option<String>,
}

/// Wire response to one status poll.
#[derive(Debug, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<PollResult>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollResult {
    /// Download URL for the finished image.
    #[serde(default)]
    pub sample: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_terminals() {
        assert_eq!(JobStatus::classify("Ready"), JobStatus::Ready);
        assert_eq!(JobStatus::classify("Failed"), JobStatus::Failed);
        assert_eq!(JobStatus::classify("Error"), JobStatus::Failed);
    }

    #[test]
    fn test_classify_is_permissive() {
        // Unrecognized states keep the poll loop alive.
        assert_eq!(JobStatus::classify("Pending"), JobStatus::Pending);
        assert_eq!(JobStatus::classify("Queued"), JobStatus::Pending);
        assert_eq!(JobStatus::classify("Moderated"), JobStatus::Pending);
        assert_eq!(JobStatus::classify(""), JobStatus::Pending);
        // Case-sensitive: the service emits exact literals.
        assert_eq!(JobStatus::classify("ready"), JobStatus::Pending);
    }

    #[test]
    fn test_poll_response_parsing() {
        let json = r#"{"status":"Ready","result":{"sample":"https://cdn.example/img.jpg"}}"#;
        let resp: PollResponse = serde_json::from_str(json).unwrap();
        assert_eq!(JobStatus::classify(&resp.status), JobStatus::Ready);
        assert_eq!(
            resp.result.and_then(|r| r.sample).as_deref(),
            Some("https://cdn.example/img.jpg")
        );

        let json = r#"{"status":"Failed","failure_reason":"nsfw"}"#;
        let resp: PollResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.failure_reason.as_deref(), Some("nsfw"));
    }
}
