//! Page publication: upload the generated images, assemble the lead page
//! document and hand it to a [`PageSink`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use leadgen_comfyui::lead_images::LeadImages;
use leadgen_comfyui::queue::Artifact;
use leadgen_core::content::{ContentCopy, LeadGenContent, MetaCopy, TitledText};
use leadgen_core::error::CoreError;
use leadgen_core::naming::{lead_page_url, slugify};
use leadgen_core::types::DocumentId;

/// Value of `generatedBy` on every page this service creates.
pub const GENERATED_BY: &str = "AI Agent";

/// The lead page document as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadGenPage {
    pub title: String,
    pub slug: String,
    pub hero_section: PageHero,
    pub benefits: Vec<TitledText>,
    pub features_section: PageFeatures,
    pub content_section: ContentCopy,
    pub lead_form: PageLeadForm,
    pub generated_by: String,
    pub ai_prompt: String,
    pub meta: MetaCopy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHero {
    pub headline: String,
    pub subheadline: String,
    /// Media id of the hero banner.
    pub image: DocumentId,
    pub cta_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFeatures {
    pub title: String,
    pub features: Vec<PageFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFeature {
    pub title: String,
    pub description: String,
    /// Media id, or `null` when there are more features than images.
    pub image: Option<DocumentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLeadForm {
    pub title: String,
    pub description: String,
    pub fields: Vec<FormField>,
    pub submit_button_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Textarea,
}

/// The fixed contact form on every lead page.
pub fn default_form_fields() -> Vec<FormField> {
    [
        ("Name", FieldKind::Text, true),
        ("Email", FieldKind::Email, true),
        ("Phone", FieldKind::Tel, false),
        ("Message", FieldKind::Textarea, false),
    ]
    .into_iter()
    .map(|(label, kind, required)| FormField {
        label: label.to_string(),
        kind,
        required,
    })
    .collect()
}

/// Alt text for the hero banner.
pub fn hero_alt(title: &str) -> String {
    format!("Hero image for {title}")
}

/// Alt text for the `n`th (1-based) feature image.
pub fn feature_alt(n: usize, title: &str) -> String {
    format!("Feature image {n} for {title}")
}

/// Build the page document from generated copy and uploaded media ids.
///
/// Feature `i` gets `feature_image_ids[i]`, or `None` when there are fewer
/// images than features.
pub fn assemble_page(
    content: &LeadGenContent,
    hero_image_id: DocumentId,
    feature_image_ids: &[DocumentId],
    prompt: &str,
) -> LeadGenPage {
    let features = content
        .features_section
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| PageFeature {
            title: feature.title.clone(),
            description: feature.description.clone(),
            image: feature_image_ids.get(i).cloned(),
        })
        .collect();

    LeadGenPage {
        title: content.title.clone(),
        slug: slugify(&content.title),
        hero_section: PageHero {
            headline: content.hero_section.headline.clone(),
            subheadline: content.hero_section.subheadline.clone(),
            image: hero_image_id,
            cta_text: content.hero_section.cta_text.clone(),
        },
        benefits: content.benefits.clone(),
        features_section: PageFeatures {
            title: content.features_section.title.clone(),
            features,
        },
        content_section: content.content_section.clone(),
        lead_form: PageLeadForm {
            title: content.lead_form.title.clone(),
            description: content.lead_form.description.clone(),
            fields: default_form_fields(),
            submit_button_text: content.lead_form.submit_button_text.clone(),
        },
        generated_by: GENERATED_BY.to_string(),
        ai_prompt: prompt.to_string(),
        meta: content.meta.clone(),
    }
}

/// Errors raised by a [`PageSink`].
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to upload image: {0}")]
    Upload(String),

    #[error("A page with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Destination for generated media and pages.
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Store an image and return its media id.
    async fn upload_media(&self, artifact: &Artifact, alt: &str)
        -> Result<DocumentId, PublishError>;

    /// Remove a stored image. Unknown ids are ignored.
    async fn delete_media(&self, id: &str) -> Result<(), PublishError>;

    /// Whether a page with `slug` is already stored.
    async fn slug_exists(&self, slug: &str) -> Result<bool, PublishError>;

    /// Store a page and return its id.
    async fn create_page(&self, page: &LeadGenPage) -> Result<DocumentId, PublishError>;
}

/// Identifiers of a published page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPage {
    pub page_id: DocumentId,
    pub slug: String,
    pub page_url: String,
}

/// Upload the images, then create the page that references them.
///
/// A taken slug is rejected before anything is uploaded. If creating the
/// page still fails, the images uploaded for it are deleted again.
pub async fn publish_lead_page(
    sink: &dyn PageSink,
    content: &LeadGenContent,
    images: &LeadImages,
    prompt: &str,
) -> Result<PublishedPage, PublishError> {
    let slug = slugify(&content.title);
    if sink.slug_exists(&slug).await? {
        return Err(PublishError::DuplicateSlug(slug));
    }

    let mut uploaded = Vec::with_capacity(1 + images.feature_images.len());
    let result = upload_and_create(sink, content, images, prompt, &mut uploaded).await;

    if result.is_err() {
        discard_media(sink, &uploaded).await;
    }
    result
}

async fn upload_and_create(
    sink: &dyn PageSink,
    content: &LeadGenContent,
    images: &LeadImages,
    prompt: &str,
    uploaded: &mut Vec<DocumentId>,
) -> Result<PublishedPage, PublishError> {
    let hero_image_id = sink
        .upload_media(&images.hero_image, &hero_alt(&content.title))
        .await?;
    uploaded.push(hero_image_id.clone());

    let mut feature_image_ids = Vec::with_capacity(images.feature_images.len());
    for (i, artifact) in images.feature_images.iter().enumerate() {
        let id = sink
            .upload_media(artifact, &feature_alt(i + 1, &content.title))
            .await?;
        uploaded.push(id.clone());
        feature_image_ids.push(id);
    }

    let page = assemble_page(content, hero_image_id, &feature_image_ids, prompt);
    let page_id = sink.create_page(&page).await?;

    tracing::info!(page_id = %page_id, slug = %page.slug, "Lead page created");

    Ok(PublishedPage {
        page_url: lead_page_url(&page.slug),
        slug: page.slug,
        page_id,
    })
}

async fn discard_media(sink: &dyn PageSink, ids: &[DocumentId]) {
    for id in ids {
        if let Err(e) = sink.delete_media(id).await {
            tracing::warn!(media_id = %id, error = %e, "Failed to delete orphaned media");
        }
    }
}
