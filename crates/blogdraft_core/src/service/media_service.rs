//! Media blob cache use-case service.
//!
//! # Responsibility
//! - Generate ids and metadata for images attached to paragraphs.
//! - Offer fire-and-forget variants that log failures instead of returning
//!   them, so paragraph editing never depends on the blob cache.
//! - Sweep blobs older than the retention window.
//!
//! # Invariants
//! - Best-effort calls never retry and never touch editor state.

use crate::config::EditorConfig;
use crate::model::media::{MediaId, MediaMetadata, MediaRecord};
use crate::model::paragraph::ParagraphId;
use crate::repo::media_repo::MediaRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Input for storing one image blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreImageRequest {
    pub paragraph_id: ParagraphId,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Use-case service over a media repository.
pub struct MediaService<R: MediaRepository> {
    repo: R,
}

impl<R: MediaRepository> MediaService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores one image under a freshly generated id.
    pub fn store_image(&self, request: StoreImageRequest, now_ms: i64) -> RepoResult<MediaRecord> {
        let record = MediaRecord {
            id: MediaId::generate(),
            paragraph_id: request.paragraph_id,
            data: request.data,
            metadata: MediaMetadata {
                uploaded_at: now_ms,
                filename: request.filename,
                mime_type: request.mime_type,
            },
        };
        self.repo.save(&record)?;
        info!(
            "event=media_store module=media status=ok media_id={} paragraph_id={} bytes={}",
            record.id,
            record.paragraph_id,
            record.size()
        );
        Ok(record)
    }

    /// Fire-and-forget variant of [`MediaService::store_image`].
    pub fn store_best_effort(&self, request: StoreImageRequest, now_ms: i64) -> Option<MediaId> {
        let paragraph_id = request.paragraph_id.clone();
        match self.store_image(request, now_ms) {
            Ok(record) => Some(record.id),
            Err(err) => {
                warn!(
                    "event=media_store module=media status=error paragraph_id={} error={}",
                    paragraph_id, err
                );
                None
            }
        }
    }

    pub fn get(&self, id: &MediaId) -> RepoResult<Option<MediaRecord>> {
        self.repo.get(id)
    }

    pub fn images_for_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<Vec<MediaRecord>> {
        self.repo.list_by_paragraph(paragraph_id)
    }

    pub fn list_all(&self) -> RepoResult<Vec<MediaRecord>> {
        self.repo.list_all()
    }

    pub fn delete(&self, id: &MediaId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn delete_for_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<usize> {
        self.repo.delete_by_paragraph(paragraph_id)
    }

    /// Removes a deleted paragraph's images, logging instead of failing.
    pub fn purge_paragraph_best_effort(&self, paragraph_id: &ParagraphId) -> usize {
        match self.repo.delete_by_paragraph(paragraph_id) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(
                    "event=media_purge module=media status=error paragraph_id={} error={}",
                    paragraph_id, err
                );
                0
            }
        }
    }

    /// Deletes blobs uploaded more than `retention_ms` before `now_ms`.
    pub fn sweep_expired(&self, now_ms: i64, retention_ms: i64) -> RepoResult<usize> {
        let cutoff = now_ms.saturating_sub(retention_ms);
        let removed = self.repo.delete_older_than(cutoff)?;
        info!(
            "event=media_sweep module=media status=ok cutoff_ms={} removed={}",
            cutoff, removed
        );
        Ok(removed)
    }

    /// Sweeps using the configured retention window.
    pub fn sweep_with_config(&self, now_ms: i64, config: &EditorConfig) -> RepoResult<usize> {
        self.sweep_expired(now_ms, config.media_retention_ms())
    }
}
