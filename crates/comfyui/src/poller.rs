//! Completion polling for submitted generation jobs.
//!
//! [`wait_for_output`] queries the job history on a fixed interval until
//! the output stage reports an image or the overall timeout elapses. The
//! interval may optionally grow geometrically via [`PollConfig::multiplier`];
//! the overall deadline is the same either way.

use std::time::Duration;

use crate::error::GenerationError;
use crate::history::JobStatus;
use crate::queue::{JobHandle, JobQueue, OutputRef};

/// Tunable parameters for completion polling.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first query, and between queries.
    pub interval: Duration,
    /// Overall bound on the wait, including in-flight queries.
    pub timeout: Duration,
    /// Factor by which the interval grows after each pending query.
    /// `1.0` keeps the interval constant.
    pub multiplier: f64,
    /// Upper bound on the interval when `multiplier > 1.0`.
    pub max_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
            multiplier: 1.0,
            max_interval: Duration::from_secs(10),
        }
    }
}

impl PollConfig {
    /// Constant-interval polling.
    pub fn fixed(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            multiplier: 1.0,
            max_interval: interval,
        }
    }
}

/// Calculate the next poll interval from the current one.
///
/// The result is clamped to [`PollConfig::max_interval`] and never shrinks
/// below the current interval.
pub fn next_interval(current: Duration, config: &PollConfig) -> Duration {
    if config.multiplier <= 1.0 {
        return current;
    }
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms)
        .min(config.max_interval)
        .max(current)
}

/// Poll `handle` until its output is available.
///
/// Returns [`GenerationError::Query`] as soon as one status query fails, and
/// [`GenerationError::Timeout`] once `config.timeout` has elapsed without an
/// output. The first query is issued one interval after the call.
pub async fn wait_for_output<Q>(
    queue: &Q,
    handle: &JobHandle,
    config: &PollConfig,
) -> Result<OutputRef, GenerationError>
where
    Q: JobQueue + ?Sized,
{
    match tokio::time::timeout(config.timeout, poll_until_complete(queue, handle, config)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                prompt_id = %handle,
                timeout_secs = config.timeout.as_secs(),
                "Image generation timed out",
            );
            Err(GenerationError::Timeout {
                prompt_id: handle.to_string(),
                timeout: config.timeout,
            })
        }
    }
}

async fn poll_until_complete<Q>(
    queue: &Q,
    handle: &JobHandle,
    config: &PollConfig,
) -> Result<OutputRef, GenerationError>
where
    Q: JobQueue + ?Sized,
{
    let mut delay = config.interval;
    let mut attempt = 0u32;

    loop {
        tokio::time::sleep(delay).await;
        attempt += 1;

        let history = queue
            .history(handle)
            .await
            .map_err(|source| GenerationError::Query {
                prompt_id: handle.to_string(),
                attempt,
                source,
            })?;

        match JobStatus::from_history(&history, handle) {
            JobStatus::Complete(output) => {
                tracing::info!(
                    prompt_id = %handle,
                    attempt,
                    filename = %output.filename,
                    "Image generation complete",
                );
                return Ok(output);
            }
            JobStatus::Pending => {
                tracing::trace!(prompt_id = %handle, attempt, "Job still pending");
            }
            JobStatus::Unknown => {
                tracing::warn!(prompt_id = %handle, attempt, "Unrecognised history response");
            }
        }

        delay = next_interval(delay, config);
    }
}
