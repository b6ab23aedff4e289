//! End-to-end lead page generation.
//!
//! Combines the text-generation client, the image set from
//! `leadgen-comfyui`, and a [`publish::PageSink`] into
//! [`pipeline::LeadPagePipeline`].

pub mod content;
pub mod memory_store;
pub mod pipeline;
pub mod publish;
pub mod text;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
