//! Scripted [`TextGenerator`] and sample fixtures for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use leadgen_comfyui::lead_images::LeadImages;
use leadgen_comfyui::queue::Artifact;
use leadgen_core::content::LeadGenContent;

use crate::text::{TextGenerationError, TextGenerator};

/// A well-formed page copy payload.
pub const SAMPLE_CONTENT_JSON: &str = r#"{
    "title": "Fast Freight Fulfillment",
    "heroSection": {
        "headline": "Ship faster",
        "subheadline": "Warehousing that scales",
        "ctaText": "Get a quote"
    },
    "benefits": [
        { "title": "Speed", "description": "Same-day dispatch" },
        { "title": "Accuracy", "description": "Every order checked" },
        { "title": "Visibility", "description": "Live inventory" }
    ],
    "featuresSection": {
        "title": "What we do",
        "features": [
            { "title": "Storage", "description": "Climate controlled" },
            { "title": "Pick & pack", "description": "99.9% accuracy" }
        ]
    },
    "contentSection": { "title": "About", "content": "We move boxes." },
    "leadForm": {
        "title": "Get in touch",
        "description": "Tell us about your volume",
        "submitButtonText": "Send"
    },
    "meta": { "title": "Fast Freight", "description": "3PL services" }
}"#;

pub fn sample_content() -> LeadGenContent {
    serde_json::from_str(SAMPLE_CONTENT_JSON).expect("sample content is valid")
}

pub fn sample_images() -> LeadImages {
    let artifact = |name: &str| Artifact {
        filename: name.to_string(),
        bytes: name.as_bytes().to_vec(),
    };
    LeadImages {
        hero_image: artifact("hero.png"),
        feature_images: vec![artifact("feature-1.png"), artifact("feature-2.png")],
    }
}

/// Text generator returning a canned response.
#[derive(Default)]
pub struct FakeTextGenerator {
    response: String,
    fail_status: Option<u16>,
    offline: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeTextGenerator {
    /// Every `generate` call returns `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Default::default()
        }
    }

    /// Every `generate` call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Default::default()
        }
    }

    /// Pings fail with HTTP 503.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenerationError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        if let Some(status) = self.fail_status {
            return Err(TextGenerationError::Api {
                status,
                body: "model error".into(),
            });
        }
        Ok(self.response.clone())
    }

    async fn ping(&self) -> Result<(), TextGenerationError> {
        if self.offline {
            return Err(TextGenerationError::Api {
                status: 503,
                body: "offline".into(),
            });
        }
        Ok(())
    }
}
