//! Core domain logic for the blog module editor.
//! This crate is the single source of truth for structural invariants of
//! containers, paragraphs and the assembled document.

pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod service;

pub use config::{ConfigError, EditorConfig};
pub use editor::analyzer::{
    analyze_structure, ContainerStats, IssueSeverity, StructureAnalysis, StructureIssue,
};
pub use editor::assembler::{assemble_content, AssembleOptions};
pub use editor::debounce::{EditDebouncer, PendingEdit};
pub use editor::error::{EntityKind, StoreError, StoreResult};
pub use editor::store::EditorStore;
pub use editor::ui_state::{EditTarget, EditorSubStep, EditorUiState};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::container::{Container, ContainerId, ContainerPatch};
pub use model::form::{BlogPostForm, FormError, FormStep};
pub use model::media::{MediaId, MediaMetadata, MediaRecord};
pub use model::paragraph::{Paragraph, ParagraphId, ParagraphPatch};
pub use persistence::{EditorSnapshot, RepairReport, SnapshotError, SNAPSHOT_SCHEMA_VERSION};
pub use repo::media_repo::{MediaRepository, SqliteMediaRepository};
pub use repo::snapshot_repo::{KvRepository, SqliteKvRepository};
pub use repo::{RepoError, RepoResult};
pub use service::media_service::{MediaService, StoreImageRequest};
pub use service::session::EditorSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
