//! Single-image generation flow: submit, poll, fetch.
//!
//! [`ImageGenerator`] owns a [`JobQueue`] and a [`PollConfig`]. Each call to
//! [`ImageGenerator::generate`] owns its job handle exclusively, so
//! independent calls may run concurrently.

use std::sync::Arc;

use crate::error::GenerationError;
use crate::poller::{wait_for_output, PollConfig};
use crate::queue::{Artifact, JobHandle, JobQueue, OutputRef};
use crate::workflow::{build_workflow, random_seed, GenerationRequest};

/// Runs image-generation jobs against one queue.
#[derive(Clone)]
pub struct ImageGenerator {
    queue: Arc<dyn JobQueue>,
    poll: PollConfig,
}

impl ImageGenerator {
    pub fn new(queue: Arc<dyn JobQueue>, poll: PollConfig) -> Self {
        Self { queue, poll }
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Build the job-graph for `request` with a fresh seed and queue it.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, GenerationError> {
        let seed = random_seed();
        let workflow = build_workflow(request, seed);

        let handle = self
            .queue
            .submit(&workflow)
            .await
            .map_err(GenerationError::Submission)?;

        tracing::info!(
            prompt_id = %handle,
            seed,
            width = request.width,
            height = request.height,
            "Image generation job submitted",
        );
        Ok(handle)
    }

    /// Wait for the job's output reference.
    pub async fn wait(&self, handle: &JobHandle) -> Result<OutputRef, GenerationError> {
        wait_for_output(self.queue.as_ref(), handle, &self.poll).await
    }

    /// Download a completed output.
    pub async fn fetch(&self, output: &OutputRef) -> Result<Artifact, GenerationError> {
        let bytes = self
            .queue
            .fetch(output)
            .await
            .map_err(|source| GenerationError::Download {
                filename: output.filename.clone(),
                source,
            })?;

        tracing::debug!(filename = %output.filename, size = bytes.len(), "Downloaded generated image");

        Ok(Artifact {
            filename: output.filename.clone(),
            bytes,
        })
    }

    /// Check that the queue is reachable.
    pub async fn ping(&self) -> Result<(), crate::api::ComfyUIApiError> {
        self.queue.ping().await
    }

    /// Run the full submit, poll, fetch sequence for one image.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Artifact, GenerationError> {
        let handle = self.submit(request).await?;
        let output = self.wait(&handle).await?;
        self.fetch(&output).await
    }
}
