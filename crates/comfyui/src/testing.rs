//! In-memory [`JobQueue`] for exercising generation flows without a
//! ComfyUI server.
//!
//! Every submitted job reports pending for a configurable number of
//! history queries and then completes with a deterministic filename.
//! Failures can be injected per call index.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::ComfyUIApiError;
use crate::queue::{JobHandle, JobQueue, OutputRef};
use crate::workflow::OUTPUT_NODE_ID;

/// Scriptable in-memory job queue.
#[derive(Default)]
pub struct FakeQueue {
    pending_polls: u32,
    never_complete: bool,
    garbage_history: bool,
    fail_submission_at: Option<usize>,
    fail_history_at: Option<u32>,
    fail_fetch_at: Option<usize>,
    offline: bool,
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    submissions: Vec<Value>,
    polls_by_job: HashMap<String, u32>,
    history_calls: u32,
    fetches: Vec<OutputRef>,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each job reports pending for `n` queries before completing.
    pub fn with_pending_polls(mut self, n: u32) -> Self {
        self.pending_polls = n;
        self
    }

    /// Jobs never produce output.
    pub fn never_complete(mut self) -> Self {
        self.never_complete = true;
        self
    }

    /// Pending queries return a non-object body instead of `{}`.
    pub fn with_garbage_history(mut self) -> Self {
        self.garbage_history = true;
        self
    }

    /// The `n`th submission (1-based) is rejected with HTTP 500.
    pub fn fail_submission_at(mut self, n: usize) -> Self {
        self.fail_submission_at = Some(n);
        self
    }

    /// The `n`th history query (1-based, across all jobs) fails with HTTP 500.
    pub fn fail_history_at(mut self, n: u32) -> Self {
        self.fail_history_at = Some(n);
        self
    }

    /// The `n`th download (1-based) fails with HTTP 404.
    pub fn fail_fetch_at(mut self, n: usize) -> Self {
        self.fail_fetch_at = Some(n);
        self
    }

    /// Pings fail with HTTP 503.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Filename the fake reports for a completed job.
    pub fn output_filename(handle: &JobHandle) -> String {
        format!("generated_{handle}_.png")
    }

    /// Bytes the fake serves for a given output filename.
    pub fn artifact_bytes(filename: &str) -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(filename.as_bytes());
        bytes
    }

    /// Number of submission attempts, including rejected ones.
    pub fn submission_count(&self) -> usize {
        self.lock().submissions.len()
    }

    /// Job-graphs received, in submission order.
    pub fn submissions(&self) -> Vec<Value> {
        self.lock().submissions.clone()
    }

    /// Total history queries across all jobs.
    pub fn history_calls(&self) -> u32 {
        self.lock().history_calls
    }

    /// Number of download attempts, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn server_error(body: &str) -> ComfyUIApiError {
        ComfyUIApiError::ApiError {
            status: 500,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl JobQueue for FakeQueue {
    async fn submit(&self, workflow: &Value) -> Result<JobHandle, ComfyUIApiError> {
        let mut state = self.lock();
        state.submissions.push(workflow.clone());
        let n = state.submissions.len();

        if self.fail_submission_at == Some(n) {
            return Err(Self::server_error("queue rejected prompt"));
        }
        Ok(JobHandle::new(format!("job-{n}")))
    }

    async fn history(&self, handle: &JobHandle) -> Result<Value, ComfyUIApiError> {
        let mut state = self.lock();
        state.history_calls += 1;

        if self.fail_history_at == Some(state.history_calls) {
            return Err(Self::server_error("history unavailable"));
        }

        let polls = state
            .polls_by_job
            .entry(handle.to_string())
            .or_default();
        *polls += 1;

        if self.never_complete || *polls <= self.pending_polls {
            return Ok(if self.garbage_history {
                Value::String("busy".into())
            } else {
                json!({})
            });
        }

        Ok(json!({
            handle.as_str(): {
                "outputs": {
                    OUTPUT_NODE_ID: {
                        "images": [{
                            "filename": Self::output_filename(handle),
                            "subfolder": "",
                            "type": "output"
                        }]
                    }
                }
            }
        }))
    }

    async fn fetch(&self, output: &OutputRef) -> Result<Vec<u8>, ComfyUIApiError> {
        let mut state = self.lock();
        state.fetches.push(output.clone());

        if self.fail_fetch_at == Some(state.fetches.len()) {
            return Err(ComfyUIApiError::ApiError {
                status: 404,
                body: "file not found".into(),
            });
        }
        Ok(Self::artifact_bytes(&output.filename))
    }

    async fn ping(&self) -> Result<(), ComfyUIApiError> {
        if self.offline {
            return Err(ComfyUIApiError::ApiError {
                status: 503,
                body: "offline".into(),
            });
        }
        Ok(())
    }
}
