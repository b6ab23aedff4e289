//! In-process [`PageSink`] holding pages and media in memory.
//!
//! Thread-safe via interior `RwLock`s; wrap in `Arc` to share between the
//! pipeline and the HTTP handlers that serve stored documents.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use leadgen_comfyui::queue::Artifact;
use leadgen_core::types::{DocumentId, Timestamp};

use crate::publish::{LeadGenPage, PageSink, PublishError};

/// A stored image.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub id: DocumentId,
    /// Source filename with a unique suffix, e.g. `generated_00001_-<uuid>.png`.
    pub filename: String,
    pub alt: String,
    pub bytes: Vec<u8>,
    pub created_at: Timestamp,
}

/// A stored page document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPage {
    pub id: DocumentId,
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub page: LeadGenPage,
}

/// Memory-backed page and media store.
#[derive(Default)]
pub struct MemoryPageSink {
    pages: RwLock<HashMap<DocumentId, StoredPage>>,
    media: RwLock<HashMap<DocumentId, StoredMedia>>,
}

impl MemoryPageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_page(&self, id: &str) -> Option<StoredPage> {
        self.pages.read().await.get(id).cloned()
    }

    /// Look a page up by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Option<StoredPage> {
        self.pages
            .read()
            .await
            .values()
            .find(|stored| stored.page.slug == slug)
            .cloned()
    }

    pub async fn get_media(&self, id: &str) -> Option<StoredMedia> {
        self.media.read().await.get(id).cloned()
    }

    pub async fn page_count(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn media_count(&self) -> usize {
        self.media.read().await.len()
    }
}

/// Add a random suffix to the file stem so repeated uploads never collide.
fn unique_filename(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let suffix = uuid::Uuid::new_v4();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{suffix}.{ext}"),
        None => format!("{stem}-{suffix}"),
    }
}

#[async_trait]
impl PageSink for MemoryPageSink {
    async fn upload_media(
        &self,
        artifact: &Artifact,
        alt: &str,
    ) -> Result<DocumentId, PublishError> {
        if artifact.bytes.is_empty() {
            return Err(PublishError::Upload(format!(
                "{} has no content",
                artifact.filename
            )));
        }

        let media = StoredMedia {
            id: uuid::Uuid::new_v4().to_string(),
            filename: unique_filename(&artifact.filename),
            alt: alt.to_string(),
            bytes: artifact.bytes.clone(),
            created_at: chrono::Utc::now(),
        };
        let id = media.id.clone();

        tracing::debug!(media_id = %id, filename = %media.filename, "Stored media");
        self.media.write().await.insert(id.clone(), media);
        Ok(id)
    }

    async fn delete_media(&self, id: &str) -> Result<(), PublishError> {
        if self.media.write().await.remove(id).is_some() {
            tracing::debug!(media_id = %id, "Deleted media");
        }
        Ok(())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, PublishError> {
        Ok(self
            .pages
            .read()
            .await
            .values()
            .any(|stored| stored.page.slug == slug))
    }

    async fn create_page(&self, page: &LeadGenPage) -> Result<DocumentId, PublishError> {
        let mut pages = self.pages.write().await;
        if pages.values().any(|stored| stored.page.slug == page.slug) {
            return Err(PublishError::DuplicateSlug(page.slug.clone()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        pages.insert(
            id.clone(),
            StoredPage {
                id: id.clone(),
                created_at: chrono::Utc::now(),
                page: page.clone(),
            },
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::publish::assemble_page;
    use crate::testing::sample_content;

    fn artifact(name: &str) -> Artifact {
        Artifact {
            filename: name.into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn unique_filename_keeps_extension() {
        let name = unique_filename("generated_00001_.png");
        assert!(name.starts_with("generated_00001_-"));
        assert!(name.ends_with(".png"));
        assert_ne!(name, unique_filename("generated_00001_.png"));
    }

    #[test]
    fn unique_filename_without_extension() {
        let name = unique_filename("raw");
        assert!(name.starts_with("raw-"));
        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn media_round_trip() {
        let sink = MemoryPageSink::new();
        let id = sink.upload_media(&artifact("a.png"), "alt text").await.unwrap();

        let media = sink.get_media(&id).await.unwrap();
        assert_eq!(media.alt, "alt text");
        assert_eq!(media.bytes, vec![1, 2, 3]);
        assert!(sink.get_media("missing").await.is_none());
    }

    #[tokio::test]
    async fn empty_media_is_rejected() {
        let sink = MemoryPageSink::new();
        let empty = Artifact {
            filename: "empty.png".into(),
            bytes: Vec::new(),
        };
        let err = sink.upload_media(&empty, "alt").await.unwrap_err();
        assert_matches!(err, PublishError::Upload(_));
        assert_eq!(sink.media_count().await, 0);
    }

    #[tokio::test]
    async fn pages_are_found_by_id_and_slug() {
        let sink = MemoryPageSink::new();
        let page = assemble_page(&sample_content(), "h".into(), &[], "prompt");

        let id = sink.create_page(&page).await.unwrap();

        assert_eq!(sink.get_page(&id).await.unwrap().page, page);
        assert_eq!(
            sink.find_by_slug("fast-freight-fulfillment").await.unwrap().id,
            id
        );
        assert_eq!(sink.page_count().await, 1);
    }

    #[tokio::test]
    async fn deleted_media_is_gone() {
        let sink = MemoryPageSink::new();
        let id = sink.upload_media(&artifact("a.png"), "alt").await.unwrap();

        sink.delete_media(&id).await.unwrap();
        sink.delete_media("missing").await.unwrap();

        assert!(sink.get_media(&id).await.is_none());
        assert_eq!(sink.media_count().await, 0);
    }

    #[tokio::test]
    async fn slug_exists_after_create() {
        let sink = MemoryPageSink::new();
        let page = assemble_page(&sample_content(), "h".into(), &[], "prompt");
        assert!(!sink.slug_exists(&page.slug).await.unwrap());

        sink.create_page(&page).await.unwrap();

        assert!(sink.slug_exists("fast-freight-fulfillment").await.unwrap());
        assert!(!sink.slug_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn stored_page_serializes_flat() {
        let sink = MemoryPageSink::new();
        let page = assemble_page(&sample_content(), "h".into(), &[], "prompt");
        let id = sink.create_page(&page).await.unwrap();

        let json = serde_json::to_value(sink.get_page(&id).await.unwrap()).unwrap();
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["slug"], "fast-freight-fulfillment");
        assert!(json.get("createdAt").is_some());
    }
}
