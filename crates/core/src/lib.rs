//! Shared domain types and pure helpers for the lead-page generator.
//!
//! Nothing in this crate performs I/O. The HTTP clients live in
//! `leadgen-comfyui` and `leadgen-pipeline`.

pub mod content;
pub mod error;
pub mod json_extract;
pub mod naming;
pub mod prompt;
pub mod types;
