//! The job-queue seam between the generation flow and ComfyUI.
//!
//! [`JobQueue`] abstracts the three HTTP calls a generation flow needs so
//! the poller and orchestrator can run against an in-memory queue in tests.
//! [`ComfyUIApi`] is the production implementation.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::{ComfyUIApi, ComfyUIApiError};

/// Identifier returned by the queue on submission; the polling key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(prompt_id: impl Into<String>) -> Self {
        Self(prompt_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a produced output file, as reported by `/history`.
///
/// ComfyUI sends `null` for `subfolder` and `type` on some outputs; both
/// read as their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRef {
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subfolder: String,
    /// ComfyUI storage area (`output`, `temp`, `input`).
    #[serde(
        rename = "type",
        default = "default_output_kind",
        deserialize_with = "null_as_output_kind"
    )]
    pub kind: String,
}

fn default_output_kind() -> String {
    "output".to_string()
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_output_kind<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_output_kind))
}

/// A downloaded output file. Owned by the caller once fetched.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// External image-generation job queue.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Submit a job-graph and return the queue's handle for it.
    async fn submit(&self, workflow: &serde_json::Value) -> Result<JobHandle, ComfyUIApiError>;

    /// Fetch the raw history entry for a job.
    async fn history(&self, handle: &JobHandle) -> Result<serde_json::Value, ComfyUIApiError>;

    /// Download the bytes of a produced output.
    async fn fetch(&self, output: &OutputRef) -> Result<Vec<u8>, ComfyUIApiError>;

    /// Check that the queue is reachable.
    async fn ping(&self) -> Result<(), ComfyUIApiError>;
}

#[async_trait]
impl JobQueue for ComfyUIApi {
    async fn submit(&self, workflow: &serde_json::Value) -> Result<JobHandle, ComfyUIApiError> {
        self.queue_prompt(workflow).await
    }

    async fn history(&self, handle: &JobHandle) -> Result<serde_json::Value, ComfyUIApiError> {
        self.get_history(handle.as_str()).await
    }

    async fn fetch(&self, output: &OutputRef) -> Result<Vec<u8>, ComfyUIApiError> {
        self.view(output).await
    }

    async fn ping(&self) -> Result<(), ComfyUIApiError> {
        ComfyUIApi::ping(self).await
    }
}
