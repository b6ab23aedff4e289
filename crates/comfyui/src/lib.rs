//! ComfyUI REST client and image-generation job runner.
//!
//! Provides the HTTP API wrapper, the text-to-image job-graph builder,
//! history parsing, the completion poller, and the orchestrator that
//! produces the hero and feature images for a lead page.

pub mod api;
pub mod error;
pub mod generator;
pub mod history;
pub mod lead_images;
pub mod poller;
pub mod queue;
pub mod workflow;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
