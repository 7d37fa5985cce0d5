//! Debounced propagation of rich-text edits into the store.
//!
//! # Responsibility
//! - Coalesce rapid keystrokes on one paragraph into a single commit.
//!
//! # Invariants
//! - At most one pending edit per paragraph; the latest text wins.
//! - Each new keystroke pushes the paragraph's deadline out by the full delay.
//! - Time is supplied by the caller; nothing here sleeps or spawns.

use crate::model::paragraph::ParagraphId;

/// Default quiet period before an edit is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// One edit waiting for its quiet period to pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub paragraph_id: ParagraphId,
    pub content: String,
    /// Epoch ms at which the edit becomes due.
    pub due_at: i64,
}

/// Per-paragraph trailing-edge debouncer.
#[derive(Debug, Clone)]
pub struct EditDebouncer {
    delay_ms: i64,
    pending: Vec<PendingEdit>,
}

impl Default for EditDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl EditDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms: i64::try_from(delay_ms).unwrap_or(i64::MAX),
            pending: Vec::new(),
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms as u64
    }

    /// Records the latest text for one paragraph.
    pub fn push(&mut self, paragraph_id: ParagraphId, content: impl Into<String>, now_ms: i64) {
        let due_at = now_ms.saturating_add(self.delay_ms);
        let content = content.into();
        match self
            .pending
            .iter_mut()
            .find(|edit| edit.paragraph_id == paragraph_id)
        {
            Some(edit) => {
                edit.content = content;
                edit.due_at = due_at;
            }
            None => self.pending.push(PendingEdit {
                paragraph_id,
                content,
                due_at,
            }),
        }
    }

    /// Removes and returns edits whose deadline is at or before `now_ms`,
    /// in first-push order.
    pub fn drain_due(&mut self, now_ms: i64) -> Vec<PendingEdit> {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|edit| edit.due_at <= now_ms);
        self.pending = waiting;
        due
    }

    /// Removes and returns every pending edit regardless of deadline.
    pub fn flush_all(&mut self) -> Vec<PendingEdit> {
        std::mem::take(&mut self.pending)
    }

    /// Discards pending edits. Returns how many were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Earliest pending deadline, if any.
    pub fn next_due_at(&self) -> Option<i64> {
        self.pending.iter().map(|edit| edit.due_at).min()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending text for one paragraph, if an edit is waiting.
    pub fn pending_content(&self, paragraph_id: &ParagraphId) -> Option<&str> {
        self.pending
            .iter()
            .find(|edit| &edit.paragraph_id == paragraph_id)
            .map(|edit| edit.content.as_str())
    }
}
