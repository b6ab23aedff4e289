use std::sync::Arc;

use leadgen_pipeline::memory_store::MemoryPageSink;
use leadgen_pipeline::pipeline::LeadPagePipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generates and publishes lead pages into `store`.
    pub pipeline: LeadPagePipeline,
    /// Page and media store read by the document endpoints.
    pub store: Arc<MemoryPageSink>,
}
