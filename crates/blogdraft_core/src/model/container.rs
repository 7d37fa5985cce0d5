//! Container (document section) model.
//!
//! # Invariants
//! - `id` is immutable after creation.
//! - `order` is unique among live containers of one editor store.

use super::{now_epoch_ms, string_id};
use serde::{Deserialize, Serialize};

string_id!(
    /// Stable container identifier.
    ContainerId,
    "container_"
);

/// Named, ordered section of the authored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    /// User-facing section label.
    pub name: String,
    /// Assembly position among containers, ascending.
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Container {
    /// Creates a container with a generated id.
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self::with_id(ContainerId::generate(), name, order)
    }

    /// Creates a container with a caller-provided id.
    ///
    /// Used by snapshot restore and tests where identity already exists.
    pub fn with_id(id: impl Into<ContainerId>, name: impl Into<String>, order: i64) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            name: name.into(),
            order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Shallow partial update for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerPatch {
    pub name: Option<String>,
    pub order: Option<i64>,
}

impl ContainerPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            order: None,
        }
    }

    pub fn reorder(order: i64) -> Self {
        Self {
            name: None,
            order: Some(order),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.order.is_none()
    }
}
