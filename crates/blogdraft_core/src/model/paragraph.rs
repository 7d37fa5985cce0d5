//! Paragraph (content block) model.
//!
//! # Invariants
//! - `id` is immutable after creation.
//! - `container_id == None` means the paragraph sits in the unassigned pool.
//! - `order` is meaningful only inside the paragraph's current bucket.
//! - `updated_at` moves forward on every content or assignment change.

use super::container::ContainerId;
use super::{now_epoch_ms, string_id};
use serde::{Deserialize, Serialize};

string_id!(
    /// Stable paragraph identifier.
    ParagraphId,
    "paragraph_"
);

/// Unit of rich-text content, optionally assigned to a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: ParagraphId,
    /// Markdown or HTML produced by the rich-text widget.
    pub content: String,
    pub container_id: Option<ContainerId>,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Identity of the authoring session this block was produced by.
    ///
    /// Routes "edit" actions back to the widget instance that owns the text.
    #[serde(default)]
    pub original_id: Option<String>,
}

impl Paragraph {
    /// Creates an unassigned paragraph with a generated id.
    pub fn new(content: impl Into<String>, order: i64) -> Self {
        Self::with_id(ParagraphId::generate(), content, order)
    }

    /// Creates an unassigned paragraph with a caller-provided id.
    pub fn with_id(id: impl Into<ParagraphId>, content: impl Into<String>, order: i64) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            content: content.into(),
            container_id: None,
            order,
            created_at: now,
            updated_at: now,
            original_id: None,
        }
    }

    /// Builder-style assignment used when constructing fixtures and imports.
    pub fn in_container(mut self, container_id: impl Into<ContainerId>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Returns whether the paragraph is in the unassigned pool.
    pub fn is_unassigned(&self) -> bool {
        self.container_id.is_none()
    }

    /// Refreshes `updated_at`, never moving it backwards.
    pub(crate) fn touch(&mut self, now: i64) {
        self.updated_at = self.updated_at.max(now);
    }
}

/// Partial update for one paragraph.
///
/// Double options distinguish "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphPatch {
    pub content: Option<String>,
    pub container_id: Option<Option<ContainerId>>,
    pub order: Option<i64>,
    pub original_id: Option<Option<String>>,
}

impl ParagraphPatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.container_id.is_none()
            && self.order.is_none()
            && self.original_id.is_none()
    }
}
