//! Authoritative container/paragraph store.
//!
//! # Responsibility
//! - Own both collections and expose the only mutation surface over them.
//! - Recompute the assembled document and structure analysis synchronously
//!   after every successful mutation.
//!
//! # Invariants
//! - Container ids and container `order` values are unique.
//! - Paragraph ids are unique; every `container_id` points at a live
//!   container.
//! - Failed operations leave the store untouched.

use super::analyzer::{analyze_structure, StructureAnalysis};
use super::assembler::{
    assemble_content, has_assigned_content, paragraphs_of, sorted_containers, AssembleOptions,
};
use super::error::{EntityKind, StoreError, StoreResult};
use crate::model::container::{Container, ContainerId, ContainerPatch};
use crate::model::now_epoch_ms;
use crate::model::paragraph::{Paragraph, ParagraphId, ParagraphPatch};
use std::collections::HashSet;

/// Editor-state aggregate for the module editor.
#[derive(Debug, Clone)]
pub struct EditorStore {
    containers: Vec<Container>,
    paragraphs: Vec<Paragraph>,
    options: AssembleOptions,
    completed_content: String,
    is_completed: bool,
    analysis: StructureAnalysis,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore {
    /// Creates an empty store with default assembly options.
    pub fn new() -> Self {
        Self::with_options(AssembleOptions::default())
    }

    /// Creates an empty store with explicit assembly options.
    pub fn with_options(options: AssembleOptions) -> Self {
        let mut store = Self {
            containers: Vec::new(),
            paragraphs: Vec::new(),
            options,
            completed_content: String::new(),
            is_completed: false,
            analysis: StructureAnalysis::default(),
        };
        store.regenerate();
        store
    }

    /// Builds a store from already-validated collections.
    ///
    /// # Errors
    /// - `DuplicateId` for repeated container or paragraph ids.
    /// - `OrderConflict` for repeated container orders.
    /// - `InvalidReference` for paragraphs pointing at unknown containers.
    pub fn from_parts(
        containers: Vec<Container>,
        paragraphs: Vec<Paragraph>,
        is_completed: bool,
        options: AssembleOptions,
    ) -> StoreResult<Self> {
        let mut store = Self::with_options(options);
        for container in containers {
            store.check_new_container(&container)?;
            store.containers.push(container);
        }
        for paragraph in paragraphs {
            store.check_new_paragraph(&paragraph)?;
            store.paragraphs.push(paragraph);
        }
        store.is_completed = is_completed;
        store.regenerate();
        Ok(store)
    }

    pub fn options(&self) -> AssembleOptions {
        self.options
    }

    /// Containers in assembly order.
    pub fn containers(&self) -> Vec<&Container> {
        sorted_containers(&self.containers)
    }

    /// All paragraphs in collection order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|container| &container.id == id)
    }

    pub fn paragraph(&self, id: &ParagraphId) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|paragraph| &paragraph.id == id)
    }

    /// Paragraphs of one container in assembly order.
    ///
    /// Unknown containers yield an empty list.
    pub fn paragraphs_in_container(&self, id: &ContainerId) -> Vec<&Paragraph> {
        match self.container(id) {
            Some(container) => paragraphs_of(&self.paragraphs, Some(container)),
            None => Vec::new(),
        }
    }

    /// Paragraphs in the unassigned pool, ordered.
    pub fn unassigned_paragraphs(&self) -> Vec<&Paragraph> {
        paragraphs_of(&self.paragraphs, None)
    }

    /// Assembled document for the current model.
    pub fn completed_content(&self) -> &str {
        &self.completed_content
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Structure diagnostics for the current model.
    pub fn analysis(&self) -> &StructureAnalysis {
        &self.analysis
    }

    /// Order value one past the highest live container order.
    pub fn next_container_order(&self) -> i64 {
        self.containers
            .iter()
            .map(|container| container.order)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Order value one past the highest order in the given bucket.
    pub fn next_paragraph_order(&self, bucket: Option<&ContainerId>) -> i64 {
        self.paragraphs
            .iter()
            .filter(|paragraph| paragraph.container_id.as_ref() == bucket)
            .map(|paragraph| paragraph.order)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Appends one container.
    pub fn add_container(&mut self, container: Container) -> StoreResult<()> {
        self.check_new_container(&container)?;
        self.containers.push(container);
        self.regenerate();
        Ok(())
    }

    /// Batch-creates containers from section-name inputs.
    ///
    /// Blank names are skipped. Orders continue after the current maximum.
    /// Returns created ids in input order.
    pub fn add_containers_from_names<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<ContainerId> {
        let mut next_order = self.next_container_order();
        let mut created = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let container = Container::new(trimmed, next_order);
            next_order += 1;
            created.push(container.id.clone());
            self.containers.push(container);
        }
        if !created.is_empty() {
            self.regenerate();
        }
        created
    }

    /// Removes one container and moves its paragraphs to the unassigned pool.
    ///
    /// Moved paragraphs keep their relative order and are appended after the
    /// existing unassigned paragraphs.
    pub fn delete_container(&mut self, id: &ContainerId) -> StoreResult<Container> {
        let index = self
            .containers
            .iter()
            .position(|container| &container.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Container, id))?;
        let removed = self.containers.remove(index);
        self.unassign_orphans();
        self.regenerate();
        Ok(removed)
    }

    /// Shallow-merges a partial update into one container.
    pub fn update_container(&mut self, id: &ContainerId, patch: ContainerPatch) -> StoreResult<()> {
        let index = self
            .containers
            .iter()
            .position(|container| &container.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Container, id))?;
        if let Some(order) = patch.order {
            self.check_order_free(order, Some(id))?;
        }
        if patch.is_empty() {
            return Ok(());
        }

        let container = &mut self.containers[index];
        if let Some(name) = patch.name {
            container.name = name;
        }
        if let Some(order) = patch.order {
            container.order = order;
        }
        container.updated_at = container.updated_at.max(now_epoch_ms());
        self.regenerate();
        Ok(())
    }

    /// Replaces the container collection wholesale with `ordered`.
    ///
    /// `order` is renumbered to list position. Paragraphs whose container is
    /// missing from the new list are moved to the unassigned pool.
    pub fn reorder_containers(&mut self, ordered: Vec<Container>) -> StoreResult<()> {
        let mut seen = HashSet::new();
        for container in &ordered {
            if !seen.insert(&container.id) {
                return Err(StoreError::duplicate(EntityKind::Container, &container.id));
            }
        }

        let now = now_epoch_ms();
        self.containers = ordered
            .into_iter()
            .enumerate()
            .map(|(index, mut container)| {
                let order = index as i64;
                if container.order != order {
                    container.order = order;
                    container.updated_at = container.updated_at.max(now);
                }
                container
            })
            .collect();
        self.unassign_orphans();
        self.regenerate();
        Ok(())
    }

    /// Appends one paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> StoreResult<()> {
        self.check_new_paragraph(&paragraph)?;
        self.paragraphs.push(paragraph);
        self.regenerate();
        Ok(())
    }

    /// Removes one paragraph.
    pub fn delete_paragraph(&mut self, id: &ParagraphId) -> StoreResult<Paragraph> {
        let index = self.paragraph_index(id)?;
        let removed = self.paragraphs.remove(index);
        self.regenerate();
        Ok(removed)
    }

    /// Applies a partial update to one paragraph.
    pub fn update_paragraph(&mut self, id: &ParagraphId, patch: ParagraphPatch) -> StoreResult<()> {
        let index = self.paragraph_index(id)?;
        if let Some(Some(container_id)) = &patch.container_id {
            self.check_container_exists(container_id)?;
        }
        if patch.is_empty() {
            return Ok(());
        }

        let paragraph = &mut self.paragraphs[index];
        if let Some(content) = patch.content {
            paragraph.content = content;
        }
        if let Some(container_id) = patch.container_id {
            paragraph.container_id = container_id;
        }
        if let Some(order) = patch.order {
            paragraph.order = order;
        }
        if let Some(original_id) = patch.original_id {
            paragraph.original_id = original_id;
        }
        paragraph.touch(now_epoch_ms());
        self.regenerate();
        Ok(())
    }

    /// Replaces the content of one paragraph.
    pub fn update_paragraph_content(
        &mut self,
        id: &ParagraphId,
        content: impl Into<String>,
    ) -> StoreResult<()> {
        let index = self.paragraph_index(id)?;
        let paragraph = &mut self.paragraphs[index];
        paragraph.content = content.into();
        paragraph.touch(now_epoch_ms());
        self.regenerate();
        Ok(())
    }

    /// Reassigns one paragraph to a container or, with `None`, to the
    /// unassigned pool.
    ///
    /// `order` is left as is; callers renumber with
    /// [`EditorStore::reorder_paragraphs_in_container`] when needed.
    pub fn move_paragraph_to_container(
        &mut self,
        paragraph_id: &ParagraphId,
        container_id: Option<&ContainerId>,
    ) -> StoreResult<()> {
        let index = self.paragraph_index(paragraph_id)?;
        if let Some(container_id) = container_id {
            self.check_container_exists(container_id)?;
        }

        let paragraph = &mut self.paragraphs[index];
        paragraph.container_id = container_id.cloned();
        paragraph.touch(now_epoch_ms());
        self.regenerate();
        Ok(())
    }

    /// Moves several paragraphs to one bucket, validating all ids first.
    ///
    /// Moved paragraphs are appended after the bucket's current last order,
    /// in the given sequence.
    pub fn move_paragraphs_to_container(
        &mut self,
        paragraph_ids: &[ParagraphId],
        container_id: Option<&ContainerId>,
    ) -> StoreResult<()> {
        for paragraph_id in paragraph_ids {
            self.paragraph_index(paragraph_id)?;
        }
        if let Some(container_id) = container_id {
            self.check_container_exists(container_id)?;
        }

        let now = now_epoch_ms();
        let mut next_order = self.next_paragraph_order(container_id);
        for paragraph_id in paragraph_ids {
            let Some(paragraph) = self
                .paragraphs
                .iter_mut()
                .find(|paragraph| &paragraph.id == paragraph_id)
            else {
                continue;
            };
            if paragraph.container_id.as_ref() == container_id {
                continue;
            }
            paragraph.container_id = container_id.cloned();
            paragraph.order = next_order;
            paragraph.touch(now);
            next_order += 1;
        }
        self.regenerate();
        Ok(())
    }

    /// Replaces every paragraph of one bucket with `ordered`.
    ///
    /// After success the bucket holds exactly the listed paragraphs in list
    /// order (`order` = position). Paragraphs of other buckets are untouched.
    ///
    /// # Errors
    /// - `InvalidReference` when `container_id` names an unknown container.
    /// - `DuplicateId` when the list repeats an id.
    /// - `BucketMismatch` when a listed paragraph lives in another bucket.
    pub fn reorder_paragraphs_in_container(
        &mut self,
        container_id: Option<&ContainerId>,
        ordered: Vec<Paragraph>,
    ) -> StoreResult<()> {
        if let Some(container_id) = container_id {
            self.check_container_exists(container_id)?;
        }
        let mut seen = HashSet::new();
        for paragraph in &ordered {
            if !seen.insert(&paragraph.id) {
                return Err(StoreError::duplicate(EntityKind::Paragraph, &paragraph.id));
            }
            if let Some(existing) = self.paragraph(&paragraph.id) {
                if existing.container_id.as_ref() != container_id {
                    return Err(StoreError::BucketMismatch {
                        paragraph_id: paragraph.id.clone(),
                        current: existing.container_id.clone(),
                    });
                }
            }
        }

        let now = now_epoch_ms();
        self.paragraphs
            .retain(|paragraph| paragraph.container_id.as_ref() != container_id);
        for (index, mut paragraph) in ordered.into_iter().enumerate() {
            paragraph.container_id = container_id.cloned();
            paragraph.order = index as i64;
            paragraph.touch(now);
            self.paragraphs.push(paragraph);
        }
        self.regenerate();
        Ok(())
    }

    /// Marks the document complete.
    ///
    /// Returns the assembled content written at completion time.
    pub fn complete_editor(&mut self) -> StoreResult<&str> {
        if !has_assigned_content(&self.containers, &self.paragraphs) {
            return Err(StoreError::NothingToComplete);
        }
        self.is_completed = true;
        Ok(self.completed_content.as_str())
    }

    /// Withdraws a previous completion signal.
    pub fn reopen_editor(&mut self) {
        self.is_completed = false;
    }

    /// Clears both collections, derived content and the completion flag.
    pub fn reset_editor_state(&mut self) {
        self.containers.clear();
        self.paragraphs.clear();
        self.is_completed = false;
        self.regenerate();
    }

    /// Consumes the store into its raw collections.
    pub fn into_parts(self) -> (Vec<Container>, Vec<Paragraph>, bool) {
        (self.containers, self.paragraphs, self.is_completed)
    }

    fn regenerate(&mut self) {
        self.completed_content =
            assemble_content(&self.containers, &self.paragraphs, &self.options);
        self.analysis = analyze_structure(&self.containers, &self.paragraphs);
        if self.is_completed && !has_assigned_content(&self.containers, &self.paragraphs) {
            self.is_completed = false;
        }
    }

    fn unassign_orphans(&mut self) {
        let live: HashSet<&ContainerId> = self
            .containers
            .iter()
            .map(|container| &container.id)
            .collect();
        let mut orphans: Vec<usize> = self
            .paragraphs
            .iter()
            .enumerate()
            .filter(|(_, paragraph)| {
                paragraph
                    .container_id
                    .as_ref()
                    .is_some_and(|container_id| !live.contains(container_id))
            })
            .map(|(index, _)| index)
            .collect();
        if orphans.is_empty() {
            return;
        }

        orphans.sort_by_key(|&index| self.paragraphs[index].order);
        let now = now_epoch_ms();
        let mut next_order = self.next_paragraph_order(None);
        for index in orphans {
            let paragraph = &mut self.paragraphs[index];
            paragraph.container_id = None;
            paragraph.order = next_order;
            paragraph.touch(now);
            next_order += 1;
        }
    }

    fn paragraph_index(&self, id: &ParagraphId) -> StoreResult<usize> {
        self.paragraphs
            .iter()
            .position(|paragraph| &paragraph.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Paragraph, id))
    }

    fn check_container_exists(&self, id: &ContainerId) -> StoreResult<()> {
        if self.container(id).is_none() {
            return Err(StoreError::InvalidReference(id.clone()));
        }
        Ok(())
    }

    fn check_order_free(&self, order: i64, except: Option<&ContainerId>) -> StoreResult<()> {
        let holder = self
            .containers
            .iter()
            .find(|container| container.order == order && Some(&container.id) != except);
        match holder {
            Some(holder) => Err(StoreError::OrderConflict {
                order,
                holder: holder.id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn check_new_container(&self, container: &Container) -> StoreResult<()> {
        if self.container(&container.id).is_some() {
            return Err(StoreError::duplicate(EntityKind::Container, &container.id));
        }
        self.check_order_free(container.order, None)
    }

    fn check_new_paragraph(&self, paragraph: &Paragraph) -> StoreResult<()> {
        if self.paragraph(&paragraph.id).is_some() {
            return Err(StoreError::duplicate(EntityKind::Paragraph, &paragraph.id));
        }
        if let Some(container_id) = &paragraph.container_id {
            self.check_container_exists(container_id)?;
        }
        Ok(())
    }
}
