use std::time::Duration;

use crate::api::ComfyUIApiError;

/// Failure of a single image-generation flow.
///
/// Every variant is terminal for the flow that raised it; nothing is
/// retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The queue was unreachable or rejected the job-graph.
    #[error("Failed to submit generation job: {0}")]
    Submission(#[source] ComfyUIApiError),

    /// A status query failed. Polling stops at the first failed query.
    #[error("Failed to query status of job {prompt_id} (poll {attempt}): {source}")]
    Query {
        prompt_id: String,
        attempt: u32,
        #[source]
        source: ComfyUIApiError,
    },

    /// The job produced no output before the deadline.
    #[error("Image generation job {prompt_id} timed out after {}s", .timeout.as_secs())]
    Timeout { prompt_id: String, timeout: Duration },

    /// The output was reported but could not be downloaded.
    #[error("Failed to download generated image {filename}: {source}")]
    Download {
        filename: String,
        #[source]
        source: ComfyUIApiError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_message_carries_upstream_status_and_body() {
        let err = GenerationError::Submission(ComfyUIApiError::ApiError {
            status: 500,
            body: "out of memory".into(),
        });
        let msg = err.to_string();
        assert!(msg.contains("500"), "{msg}");
        assert!(msg.contains("out of memory"), "{msg}");
    }

    #[test]
    fn timeout_message() {
        let err = GenerationError::Timeout {
            prompt_id: "abc".into(),
            timeout: Duration::from_secs(120),
        };
        assert_eq!(err.to_string(), "Image generation job abc timed out after 120s");
    }
}
