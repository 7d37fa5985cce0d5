//! Media blob record model.
//!
//! Images attached to paragraphs are cached locally, keyed by a generated
//! image id and indexed by owning paragraph.

use super::paragraph::ParagraphId;
use super::string_id;
use serde::{Deserialize, Serialize};

string_id!(
    /// Generated image identifier.
    MediaId,
    "img_"
);

/// Descriptive metadata stored next to the blob bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Epoch ms when the blob was stored.
    pub uploaded_at: i64,
    pub filename: String,
    pub mime_type: String,
}

/// One cached media blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,
    pub paragraph_id: ParagraphId,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub metadata: MediaMetadata,
}

impl MediaRecord {
    /// Byte size of the stored blob.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
