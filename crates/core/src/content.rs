//! Structured copy for a lead generation landing page.
//!
//! These types mirror the JSON object the text-generation service is asked
//! to produce. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All generated copy for one landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadGenContent {
    pub title: String,
    pub hero_section: HeroCopy,
    #[serde(default)]
    pub benefits: Vec<TitledText>,
    pub features_section: FeaturesCopy,
    pub content_section: ContentCopy,
    pub lead_form: LeadFormCopy,
    pub meta: MetaCopy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCopy {
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub cta_text: String,
}

/// A `{ title, description }` pair used for benefits and features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitledText {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesCopy {
    pub title: String,
    #[serde(default)]
    pub features: Vec<TitledText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCopy {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFormCopy {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_submit_text")]
    pub submit_button_text: String,
}

/// SEO metadata for the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaCopy {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

fn default_submit_text() -> String {
    "Submit".to_string()
}

impl LeadGenContent {
    /// Reject content that cannot become a page.
    ///
    /// The title drives the slug, so it must contain at least one
    /// word character.
    pub fn validate(&self) -> Result<(), CoreError> {
        if crate::naming::slugify(&self.title).is_empty() {
            return Err(CoreError::Validation(format!(
                "Generated title '{}' does not produce a usable slug",
                self.title
            )));
        }
        if self.hero_section.headline.trim().is_empty() {
            return Err(CoreError::Validation(
                "Generated hero headline is empty".to_string(),
            ));
        }
        Ok(())
    }
}
