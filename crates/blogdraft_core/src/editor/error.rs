//! Editor store error taxonomy.

use crate::model::container::ContainerId;
use crate::model::paragraph::ParagraphId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by editor store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Entity family an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Container,
    Paragraph,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Paragraph => "paragraph",
        }
    }
}

/// Errors from editor store mutations.
///
/// The store never recovers from these itself; callers convert them into
/// user-facing notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert of an id that is already present.
    DuplicateId { kind: EntityKind, id: String },
    /// Mutation or delete of an absent id.
    NotFound { kind: EntityKind, id: String },
    /// Reference to a container that does not exist.
    InvalidReference(ContainerId),
    /// Container order value already used by another live container.
    OrderConflict { order: i64, holder: ContainerId },
    /// Paragraph listed for a bucket reorder lives in a different bucket.
    BucketMismatch {
        paragraph_id: ParagraphId,
        current: Option<ContainerId>,
    },
    /// Completion requested while no assigned paragraph renders content.
    NothingToComplete,
}

impl StoreError {
    pub(crate) fn duplicate(kind: EntityKind, id: impl Display) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code for logs and UI mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate_id",
            Self::NotFound { .. } => "not_found",
            Self::InvalidReference(_) => "invalid_reference",
            Self::OrderConflict { .. } => "order_conflict",
            Self::BucketMismatch { .. } => "bucket_mismatch",
            Self::NothingToComplete => "nothing_to_complete",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { kind, id } => write!(f, "{} already exists: {id}", kind.as_str()),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.as_str()),
            Self::InvalidReference(id) => write!(f, "referenced container does not exist: {id}"),
            Self::OrderConflict { order, holder } => {
                write!(f, "container order {order} is already used by {holder}")
            }
            Self::BucketMismatch {
                paragraph_id,
                current,
            } => match current {
                Some(container_id) => write!(
                    f,
                    "paragraph {paragraph_id} belongs to container {container_id}"
                ),
                None => write!(f, "paragraph {paragraph_id} belongs to the unassigned pool"),
            },
            Self::NothingToComplete => {
                write!(f, "no assigned paragraph with content to complete")
            }
        }
    }
}

impl Error for StoreError {}
