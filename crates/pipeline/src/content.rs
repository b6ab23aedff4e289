//! Landing-page copy generation.
//!
//! The text service is asked for a JSON object in a fixed shape. Models
//! often wrap the object in prose, so the first balanced `{...}` span is
//! extracted before deserializing into [`LeadGenContent`].

use leadgen_core::content::LeadGenContent;
use leadgen_core::error::CoreError;
use leadgen_core::json_extract::first_json_object;
use leadgen_core::prompt::LeadPrompt;

use crate::text::{TextGenerationError, TextGenerator};

/// Longest raw response excerpt kept in an error message.
const EXCERPT_LEN: usize = 200;

/// Errors from turning a prompt into structured page copy.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Text(#[from] TextGenerationError),

    #[error("Could not extract JSON from the response: {excerpt}")]
    NoJsonObject { excerpt: String },

    #[error("Generated JSON does not match the page structure: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Generated content is unusable: {0}")]
    Invalid(#[from] CoreError),
}

/// Render the instruction sent to the text service.
pub fn content_prompt(lead: &LeadPrompt) -> String {
    format!(
        r#"Generate a lead generation landing page for a {business_type} business.
The business offers: {service_description}

Format the response as a JSON object with the following structure:
{{
  "title": "Page title",
  "heroSection": {{
    "headline": "Main headline",
    "subheadline": "Supporting subheadline",
    "ctaText": "Call to action button text"
  }},
  "benefits": [
    {{ "title": "Benefit 1", "description": "Description of benefit 1" }},
    {{ "title": "Benefit 2", "description": "Description of benefit 2" }},
    {{ "title": "Benefit 3", "description": "Description of benefit 3" }}
  ],
  "featuresSection": {{
    "title": "Section title",
    "features": [
      {{ "title": "Feature 1", "description": "Description of feature 1" }},
      {{ "title": "Feature 2", "description": "Description of feature 2" }}
    ]
  }},
  "contentSection": {{
    "title": "About our services",
    "content": "Detailed information about the service..."
  }},
  "leadForm": {{
    "title": "Get in touch",
    "description": "Fill out the form to learn more",
    "submitButtonText": "Submit"
  }},
  "meta": {{
    "title": "SEO title",
    "description": "SEO description"
  }}
}}

Make the content persuasive, professional, and focused on generating leads. Keep each text item concise.
"#,
        business_type = lead.business_type,
        service_description = lead.service_description,
    )
}

/// Parse a raw text-service response into validated page copy.
pub fn parse_lead_content(raw: &str) -> Result<LeadGenContent, ContentError> {
    let json = first_json_object(raw).ok_or_else(|| ContentError::NoJsonObject {
        excerpt: excerpt(raw),
    })?;
    let content: LeadGenContent = serde_json::from_str(json)?;
    content.validate()?;
    Ok(content)
}

/// Ask `text` for page copy matching `lead`.
pub async fn generate_lead_content(
    text: &dyn TextGenerator,
    lead: &LeadPrompt,
) -> Result<LeadGenContent, ContentError> {
    tracing::info!(business_type = %lead.business_type, "Generating lead page content");

    let raw = text.generate(&content_prompt(lead)).await?;
    let content = parse_lead_content(&raw)?;

    tracing::debug!(title = %content.title, "Lead page content generated");
    Ok(content)
}

fn excerpt(raw: &str) -> String {
    match raw.char_indices().nth(EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}
