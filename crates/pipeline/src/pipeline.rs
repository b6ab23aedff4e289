//! End-to-end lead page generation: prompt parsing, copy generation,
//! image generation and publication.

use std::sync::Arc;

use serde::Serialize;

use leadgen_comfyui::api::ComfyUIApiError;
use leadgen_comfyui::error::GenerationError;
use leadgen_comfyui::generator::ImageGenerator;
use leadgen_comfyui::lead_images::{ImageSetError, ImageSetMode};
use leadgen_core::error::CoreError;
use leadgen_core::naming::slugify;
use leadgen_core::prompt::LeadPrompt;

use crate::content::{generate_lead_content, ContentError};
use crate::publish::{publish_lead_page, PageSink, PublishError, PublishedPage};
use crate::text::{TextGenerationError, TextGenerator};

/// A stage of the pipeline failed. Earlier stages' output is discarded.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(CoreError),

    #[error("Failed to generate lead gen content: {0}")]
    Content(#[from] ContentError),

    #[error("Failed to generate lead gen images: {0}")]
    Images(#[from] ImageSetError),

    #[error("Failed to create lead gen page: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// True when an upstream service could not be reached at all, at any
    /// point of the run.
    pub fn is_service_unavailable(&self) -> bool {
        match self {
            PipelineError::Content(ContentError::Text(TextGenerationError::Request(e))) => {
                is_unreachable(e)
            }
            PipelineError::Images(ImageSetError { source, .. }) => match source {
                GenerationError::Submission(ComfyUIApiError::Request(e))
                | GenerationError::Query {
                    source: ComfyUIApiError::Request(e),
                    ..
                }
                | GenerationError::Download {
                    source: ComfyUIApiError::Request(e),
                    ..
                } => is_unreachable(e),
                _ => false,
            },
            _ => false,
        }
    }
}

fn is_unreachable(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

/// Reachability of one upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
}

impl ServiceState {
    fn from_ping<E: std::fmt::Display>(service: &str, result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ServiceState::Up,
            Err(e) => {
                tracing::warn!(service, error = %e, "Service health check failed");
                ServiceState::Down
            }
        }
    }
}

/// Result of pinging both upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub text_service: ServiceState,
    pub image_service: ServiceState,
}

impl ServiceHealth {
    pub fn all_up(&self) -> bool {
        self.text_service == ServiceState::Up && self.image_service == ServiceState::Up
    }

    /// Names of the services that are down.
    pub fn down_services(&self) -> Vec<&'static str> {
        let mut down = Vec::new();
        if self.text_service == ServiceState::Down {
            down.push("text generation (Ollama)");
        }
        if self.image_service == ServiceState::Down {
            down.push("image generation (ComfyUI)");
        }
        down
    }
}

/// Generates and publishes lead pages.
#[derive(Clone)]
pub struct LeadPagePipeline {
    text: Arc<dyn TextGenerator>,
    images: ImageGenerator,
    image_mode: ImageSetMode,
    sink: Arc<dyn PageSink>,
}

impl LeadPagePipeline {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        images: ImageGenerator,
        image_mode: ImageSetMode,
        sink: Arc<dyn PageSink>,
    ) -> Self {
        Self {
            text,
            images,
            image_mode,
            sink,
        }
    }

    pub fn image_mode(&self) -> ImageSetMode {
        self.image_mode
    }

    /// Ping both upstream services concurrently.
    pub async fn check_services(&self) -> ServiceHealth {
        let (text, image) = futures::join!(self.text.ping(), self.images.ping());
        ServiceHealth {
            text_service: ServiceState::from_ping("text", text),
            image_service: ServiceState::from_ping("image", image),
        }
    }

    /// Turn a free-form prompt into a published lead page.
    pub async fn run(&self, prompt: &str) -> Result<PublishedPage, PipelineError> {
        if prompt.trim().is_empty() {
            return Err(PipelineError::Validation(CoreError::Validation(
                "Prompt is required".to_string(),
            )));
        }

        let lead = LeadPrompt::parse(prompt);
        tracing::info!(
            business_type = %lead.business_type,
            service_description = %lead.service_description,
            "Starting lead page generation",
        );

        let content = generate_lead_content(self.text.as_ref(), &lead).await?;

        let slug = slugify(&content.title);
        if self.sink.slug_exists(&slug).await? {
            return Err(PipelineError::Publish(PublishError::DuplicateSlug(slug)));
        }

        let images = self
            .images
            .generate_lead_images(&lead.business_type, self.image_mode)
            .await?;
        let published = publish_lead_page(self.sink.as_ref(), &content, &images, prompt).await?;

        tracing::info!(
            page_id = %published.page_id,
            page_url = %published.page_url,
            "Lead page generation complete",
        );
        Ok(published)
    }
}
