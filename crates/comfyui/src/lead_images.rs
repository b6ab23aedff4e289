//! Image set for a lead generation page: one wide hero banner and two
//! square feature images.
//!
//! [`ImageGenerator::generate_lead_images`] runs one submit, poll, fetch
//! flow per image. The first failure aborts the whole set; artifacts that
//! were already downloaded for the set are dropped.

use std::fmt;

use futures::future::try_join_all;
use serde::Serialize;

use crate::error::GenerationError;
use crate::generator::ImageGenerator;
use crate::queue::Artifact;
use crate::workflow::GenerationRequest;

/// Number of feature images on a lead page.
pub const FEATURE_IMAGE_COUNT: u8 = 2;

/// Hero banner size (wide aspect ratio).
pub const HERO_SIZE: (u32, u32) = (1024, 512);

/// Feature image size (square).
pub const FEATURE_SIZE: (u32, u32) = (512, 512);

/// Which image of the set a flow produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Hero,
    /// 1-based feature index.
    Feature(u8),
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSlot::Hero => f.write_str("hero image"),
            ImageSlot::Feature(n) => write!(f, "feature image {n}"),
        }
    }
}

/// How the flows of one image set are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSetMode {
    /// Hero, then feature 1, then feature 2.
    #[default]
    Sequential,
    /// All flows at once. Jobs are independent, so only wall time changes.
    Concurrent,
}

impl std::str::FromStr for ImageSetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ImageSetMode::Sequential),
            "concurrent" => Ok(ImageSetMode::Concurrent),
            other => Err(format!(
                "Invalid image mode '{other}'. Must be one of: sequential, concurrent"
            )),
        }
    }
}

/// All images for one lead page.
#[derive(Debug, Clone)]
pub struct LeadImages {
    pub hero_image: Artifact,
    pub feature_images: Vec<Artifact>,
}

/// A flow of the image set failed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to generate {slot}: {source}")]
pub struct ImageSetError {
    pub slot: ImageSlot,
    #[source]
    pub source: GenerationError,
}

/// Prompts and sizes for every image of a lead page.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadImagePlan {
    pub hero: GenerationRequest,
    pub features: Vec<GenerationRequest>,
}

impl LeadImagePlan {
    pub fn new(business_type: &str) -> Self {
        let hero = GenerationRequest::new(format!(
            "Professional marketing image for {business_type} business, hero banner, high quality, photorealistic"
        ))
        .with_size(HERO_SIZE.0, HERO_SIZE.1);

        let features = (1..=FEATURE_IMAGE_COUNT)
            .map(|n| {
                GenerationRequest::new(format!(
                    "Feature image {n} for {business_type} business, icon style, professional, clear"
                ))
                .with_size(FEATURE_SIZE.0, FEATURE_SIZE.1)
            })
            .collect();

        Self { hero, features }
    }

    /// Every request paired with its slot, in generation order.
    pub fn slots(&self) -> impl Iterator<Item = (ImageSlot, &GenerationRequest)> {
        std::iter::once((ImageSlot::Hero, &self.hero)).chain(
            self.features
                .iter()
                .zip(1u8..)
                .map(|(request, n)| (ImageSlot::Feature(n), request)),
        )
    }
}

impl ImageGenerator {
    /// Generate the hero and feature images for `business_type`.
    pub async fn generate_lead_images(
        &self,
        business_type: &str,
        mode: ImageSetMode,
    ) -> Result<LeadImages, ImageSetError> {
        let plan = LeadImagePlan::new(business_type);
        tracing::info!(
            business_type,
            ?mode,
            features = plan.features.len(),
            "Generating lead page images",
        );

        let features = plan
            .features
            .iter()
            .zip(1u8..)
            .map(|(request, n)| (ImageSlot::Feature(n), request));

        match mode {
            ImageSetMode::Sequential => {
                let hero_image = self.generate_slot(ImageSlot::Hero, &plan.hero).await?;
                let mut feature_images = Vec::with_capacity(plan.features.len());
                for (slot, request) in features {
                    feature_images.push(self.generate_slot(slot, request).await?);
                }
                Ok(LeadImages {
                    hero_image,
                    feature_images,
                })
            }
            ImageSetMode::Concurrent => {
                let (hero_image, feature_images) = futures::try_join!(
                    self.generate_slot(ImageSlot::Hero, &plan.hero),
                    try_join_all(features.map(|(slot, request)| self.generate_slot(slot, request))),
                )?;
                Ok(LeadImages {
                    hero_image,
                    feature_images,
                })
            }
        }
    }

    async fn generate_slot(
        &self,
        slot: ImageSlot,
        request: &GenerationRequest,
    ) -> Result<Artifact, ImageSetError> {
        self.generate(request).await.map_err(|source| {
            tracing::error!(%slot, error = %source, "Image generation failed");
            ImageSetError { slot, source }
        })
    }
}
