//! Extraction of the business profile from a free-form user prompt.
//!
//! Users describe the page they want in plain English, e.g.
//! `"Build a page to sell warehouse space with same-day fulfillment."`.
//! The phrase after `sell` becomes the business type and the phrase after
//! `with` becomes the service description. Each phrase ends at the first
//! sentence terminator (`.`, `!` or `?`).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Fallback when the prompt has no `sell ...` phrase.
pub const DEFAULT_BUSINESS_TYPE: &str = "generic business";
/// Fallback when the prompt has no `with ...` phrase.
pub const DEFAULT_SERVICE_DESCRIPTION: &str = "3PL services";

static SELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sell\s+([^.!?]+)").expect("valid regex"));
static WITH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)with\s+([^.!?]+)").expect("valid regex"));

/// Business profile derived from a user prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadPrompt {
    pub business_type: String,
    pub service_description: String,
}

impl LeadPrompt {
    /// Parse a prompt, falling back to defaults for missing phrases.
    pub fn parse(prompt: &str) -> Self {
        let business_type = capture_phrase(&SELL_RE, prompt)
            .unwrap_or_else(|| DEFAULT_BUSINESS_TYPE.to_string());
        let service_description = capture_phrase(&WITH_RE, prompt)
            .unwrap_or_else(|| DEFAULT_SERVICE_DESCRIPTION.to_string());

        Self {
            business_type,
            service_description,
        }
    }
}

fn capture_phrase(re: &Regex, prompt: &str) -> Option<String> {
    re.captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
